//! Behavioural tests for identifier parsing through the public API.

#[path = "common/test_constants.rs"]
mod test_constants;

use kroy::{CpuFamily, CustomMachineType, ErrorKind, MachineTypeError, qualify_machine_type};
use rstest::rstest;

use test_constants::{E2_SHORT, E2_URL, E2_ZONAL, ZONE};

#[rstest]
#[case(E2_SHORT, None)]
#[case(E2_ZONAL, Some(ZONE))]
#[case(E2_URL, Some(ZONE))]
fn all_shapes_yield_the_same_machine_type(#[case] identifier: &str, #[case] zone: Option<&str>) {
    let parsed: CustomMachineType = identifier.parse().expect("identifier should parse");
    let expected = CustomMachineType::builder(CpuFamily::E2)
        .core_count(4)
        .memory_mb(8192)
        .build()
        .expect("e2 4x8192 should be valid");

    assert_eq!(parsed.zone(), zone);
    assert_eq!(parsed.family(), expected.family());
    assert_eq!(parsed.core_count(), expected.core_count());
    assert_eq!(parsed.memory_mb(), expected.memory_mb());
    assert_eq!(parsed.short_type(), E2_SHORT);
}

#[test]
fn zonal_input_formats_back_verbatim() {
    let parsed = CustomMachineType::parse(E2_ZONAL).expect("identifier should parse");
    assert_eq!(parsed.to_string(), E2_ZONAL);
}

#[test]
fn url_input_formats_as_zonal_path() {
    let parsed = CustomMachineType::parse(E2_URL).expect("identifier should parse");
    assert_eq!(parsed.to_string(), E2_ZONAL);
}

#[test]
fn unknown_family_code_is_reported() {
    let err = CustomMachineType::parse("x3-custom-4-8192").expect_err("x3 is not a family");
    assert_eq!(
        err,
        MachineTypeError::UnknownCpuFamily {
            code: String::from("x3"),
        }
    );
}

#[test]
fn malformed_identifier_message_names_the_input() {
    let err = CustomMachineType::parse("e2-custom-four-8192").expect_err("cores must be numeric");
    assert_eq!(err.kind(), ErrorKind::MalformedIdentifier);
    let message = err.to_string();
    assert!(message.contains("e2-custom-four-8192"), "message: {message}");
    assert!(message.contains("four"), "message: {message}");
}

#[rstest]
#[case("n2-custom-32-262144", false)]
#[case("n2-custom-32-262400-ext", true)]
fn extended_memory_suffix_round_trips(#[case] identifier: &str, #[case] extra: bool) {
    let parsed = CustomMachineType::parse(identifier).expect("identifier should parse");
    assert_eq!(parsed.uses_extra_memory(), extra);
    assert_eq!(parsed.short_type(), identifier);
}

#[rstest]
#[case("e2-custom-4-8192-ext", E2_SHORT)]
#[case(
    "zones/us-central1-b/machineTypes/n2-custom-4-65536",
    "zones/us-central1-b/machineTypes/n2-custom-4-65536-ext"
)]
fn extended_memory_suffix_is_normalised(#[case] identifier: &str, #[case] canonical: &str) {
    let parsed = CustomMachineType::parse(identifier).expect("identifier should parse");
    assert_eq!(parsed.to_string(), canonical);
}

#[test]
fn blank_zone_in_path_is_rejected() {
    let err = CustomMachineType::parse("zones/ /machineTypes/e2-custom-4-8192")
        .expect_err("a blank zone is not a zone");
    assert_eq!(err.kind(), ErrorKind::MalformedIdentifier);
}

#[test]
fn parse_applies_family_limits() {
    let err = CustomMachineType::parse("zones/us-central1-b/machineTypes/n2d-custom-6-8192")
        .expect_err("n2d does not offer 6 cores");
    assert_eq!(err.kind(), ErrorKind::InvalidCoreCount);
}

#[test]
fn formatted_identifier_is_already_qualified() {
    let machine_type = CustomMachineType::builder(CpuFamily::E2Medium)
        .zone(ZONE)
        .memory_mb(8192)
        .build()
        .expect("e2-medium 8192 should be valid");
    let identifier = machine_type.to_string();

    assert_eq!(qualify_machine_type("europe-west1-d", &identifier), identifier);
    assert_eq!(
        qualify_machine_type(ZONE, &machine_type.short_type()),
        "zones/us-central1-b/machineTypes/e2-custom-medium-8192"
    );
}

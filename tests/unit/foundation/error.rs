use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LumaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        LumaError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        LumaError::acquisition("x")
            .to_string()
            .contains("image acquisition error:")
    );
    assert!(
        LumaError::stack("x")
            .to_string()
            .contains("frame stack error:")
    );
    assert!(LumaError::effect("x").to_string().contains("effect error:"));
}

#[test]
fn invalid_size_names_service_and_dimensions() {
    let err = LumaError::InvalidSize {
        service: ServiceId(7),
        width: 0,
        height: 720,
    };
    let msg = err.to_string();
    assert!(msg.contains("luma#7"));
    assert!(msg.contains("0x720"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LumaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

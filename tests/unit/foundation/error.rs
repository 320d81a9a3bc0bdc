use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ComposeError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        ComposeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn load_error_names_the_role_and_keeps_context() {
    let err = anyhow::anyhow!("no such file").context("read '/cierres/metalico.png'");
    let err = ComposeError::load(SwatchRole::Hardware, err);
    let msg = err.to_string();
    assert!(msg.starts_with("failed to load hardware image:"));
    assert!(msg.contains("metalico.png"));
    assert!(msg.contains("no such file"));
    assert_eq!(err.failed_role(), Some(SwatchRole::Hardware));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ComposeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.failed_role(), None);
}

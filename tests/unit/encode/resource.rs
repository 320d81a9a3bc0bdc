use super::*;

fn payload() -> EncodedImage {
    EncodedImage {
        mime: "image/png",
        bytes: vec![1, 2, 3],
    }
}

#[test]
fn published_handles_use_the_managed_scheme_and_are_unique() {
    let reg = ResourceRegistry::new();
    let a = reg.publish(payload());
    let b = reg.publish(payload());
    assert!(a.as_str().starts_with("blob:swatch-composer/"));
    assert!(is_managed(a.as_str()));
    assert_ne!(a, b);
    assert_eq!(reg.live_count(), 2);
    assert_eq!(reg.fetch(a.as_str()).unwrap().bytes, vec![1, 2, 3]);
}

#[test]
fn release_is_idempotent() {
    let reg = ResourceRegistry::new();
    let h = reg.publish(payload());
    assert!(reg.release(h.as_str()));
    assert!(!reg.release(h.as_str()));
    assert!(reg.fetch(h.as_str()).is_none());
    assert_eq!(reg.live_count(), 0);
}

#[test]
fn release_ignores_static_and_empty_references() {
    let reg = ResourceRegistry::new();
    let h = reg.publish(payload());
    assert!(!reg.release("/combinaciones/seam_combinada.jpg"));
    assert!(!reg.release(""));
    assert!(!reg.release("blob:someone-else/123"));
    assert_eq!(reg.live_count(), 1);
    assert!(reg.fetch(h.as_str()).is_some());
}

#[test]
fn static_paths_are_not_managed() {
    assert!(!is_managed("/telas/denim.jpg"));
    assert!(!is_managed("https://example.com/a.png"));
    assert!(is_managed("blob:swatch-composer/abc"));
}

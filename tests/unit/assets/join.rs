use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use anyhow::anyhow;

use super::*;
use crate::raster::buffer::PixelBuffer;

/// Future that stays pending for `polls` polls before resolving, waking itself each time.
struct After<T> {
    polls: u32,
    value: Option<T>,
}

impl<T: Unpin> Future for After<T> {
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        if self.polls == 0 {
            return Poll::Ready(self.value.take().expect("polled after completion"));
        }
        self.polls -= 1;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Source with scripted per-reference latency and outcome; records completion order.
#[derive(Default)]
struct ScriptedSource {
    script: Vec<(&'static str, u32, bool)>,
    completed: RefCell<Vec<String>>,
}

impl RasterSource for ScriptedSource {
    fn load(&self, reference: &str) -> impl Future<Output = anyhow::Result<RasterImage>> {
        let (delay, ok) = self
            .script
            .iter()
            .find(|(r, _, _)| *r == reference)
            .map(|(_, d, ok)| (*d, *ok))
            .unwrap_or((0, false));
        let reference = reference.to_string();
        async move {
            After {
                polls: delay,
                value: Some(()),
            }
            .await;
            self.completed.borrow_mut().push(reference.clone());
            if !ok {
                return Err(anyhow!("scripted failure for '{reference}'"));
            }
            Ok(RasterImage {
                reference,
                pixels: PixelBuffer::new(1, 1).unwrap(),
            })
        }
    }
}

#[test]
fn waits_for_the_slower_load() {
    let src = ScriptedSource {
        script: vec![("fabric", 3, true), ("closure", 0, true)],
        ..Default::default()
    };
    let pair = pollster::block_on(load_both(&src, "fabric", "closure")).unwrap();
    assert_eq!(pair.material.reference, "fabric");
    assert_eq!(pair.hardware.reference, "closure");
    // Both were in flight together: the fast one finished first.
    assert_eq!(*src.completed.borrow(), vec!["closure", "fabric"]);
}

#[test]
fn hardware_failure_is_tagged_and_short_circuits() {
    let src = ScriptedSource {
        script: vec![("fabric", 10, true), ("closure", 1, false)],
        ..Default::default()
    };
    let err = pollster::block_on(load_both(&src, "fabric", "closure")).unwrap_err();
    assert_eq!(err.failed_role(), Some(SwatchRole::Hardware));
    assert!(err.to_string().contains("scripted failure for 'closure'"));
    // The slow material load never got to finish.
    assert_eq!(*src.completed.borrow(), vec!["closure"]);
}

#[test]
fn material_failure_is_tagged() {
    let src = ScriptedSource {
        script: vec![("fabric", 0, false), ("closure", 0, true)],
        ..Default::default()
    };
    let err = pollster::block_on(load_both(&src, "fabric", "closure")).unwrap_err();
    assert_eq!(err.failed_role(), Some(SwatchRole::Material));
}

#[test]
fn simultaneous_failures_report_material() {
    let src = ScriptedSource::default();
    let err = pollster::block_on(load_both(&src, "a", "b")).unwrap_err();
    assert_eq!(err.failed_role(), Some(SwatchRole::Material));
}

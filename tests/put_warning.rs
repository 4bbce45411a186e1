//! `put(None, _)` is the one key-less call that is not an error: it is logged
//! and ignored. This file installs its own `log::Log` to observe that.

use std::cell::RefCell;
use std::sync::Once;

use llrb_table::LlrbMap;
use log::{Level, LevelFilter, Log, Metadata, Record};
use pretty_assertions::assert_eq;

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            CAPTURED.with(|c| c.borrow_mut().push((record.level(), record.args().to_string())));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<(Level, String)>) {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).expect("no other logger in this test binary");
        log::set_max_level(LevelFilter::Warn);
    });
    CAPTURED.with(|c| c.borrow_mut().clear());
    let out = f();
    (out, CAPTURED.with(|c| c.take()))
}

#[test]
fn put_without_a_key_warns_and_stores_nothing() {
    let mut st = LlrbMap::from([("a", 1), ("b", 2)]);

    let (previous, logs) = capture(|| st.put(None, 99));

    assert_eq!(previous, None);
    assert_eq!(st.len(), 2);
    assert!(st.check());
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].0, Level::Warn);
    assert!(logs[0].1.contains("put()"), "unexpected message: {}", logs[0].1);
}

#[test]
fn put_with_a_key_is_silent() {
    let mut st = LlrbMap::new();

    let (previous, logs) = capture(|| {
        st.put(Some(1), "one");
        st.put(Some(1), "uno")
    });

    assert_eq!(previous, Some("one"));
    assert_eq!(st.get(Some(&1)), Ok(Some(&"uno")));
    assert!(logs.is_empty());
}

#[test]
fn put_without_a_key_on_an_empty_table() {
    let mut st: LlrbMap<u8, ()> = LlrbMap::new();

    let (_, logs) = capture(|| st.put(None, ()));

    assert!(st.is_empty());
    assert_eq!(st.height(), None);
    assert_eq!(logs.len(), 1);
}

extern crate env_logger;
extern crate pending_result;

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use pending_result::{Builder, Connection, Error, PendingResult, Timeout};

struct Quiet;

impl Connection for Quiet {
    fn serve(&self, timeout: &Timeout) -> bool {
        timeout.sleep(Duration::from_millis(1));
        false
    }

    fn poll_all(&self) {}
}

/// A connection that claims to process a message for some other call every time
struct Busy;

impl Connection for Busy {
    fn serve(&self, _: &Timeout) -> bool {
        true
    }

    fn poll_all(&self) {}
}

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_value_expires() {
    init();

    let conn = Arc::new(Quiet);
    let res = PendingResult::<u32, ()>::new(&conn);
    res.set_expiry(Some(Duration::from_millis(10)));

    let start = Instant::now();
    assert_eq!(res.value(), Err(Error::Expired));
    assert!(start.elapsed() >= Duration::from_millis(10));
    assert!(res.is_expired());
    assert!(!res.is_ready());

    assert_eq!(res.wait(), Err(Error::Expired));
}

#[test]
fn test_unrelated_messages_do_not_stall_wait() {
    init();

    let conn = Arc::new(Busy);
    let res = PendingResult::<u32, ()>::new(&conn);
    res.set_expiry(Some(Duration::from_millis(30)));

    let start = Instant::now();
    assert_eq!(res.wait(), Err(Error::Expired));
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(30));
    assert!(elapsed < Duration::from_millis(200));
}

/// Serves `backlog` replies for other calls, then the reply for `target`
struct Backlog {
    backlog: AtomicUsize,
    target: Mutex<Option<PendingResult<u32, ()>>>,
}

impl Connection for Backlog {
    fn serve(&self, _: &Timeout) -> bool {
        if self.backlog.load(Ordering::SeqCst) > 0 {
            self.backlog.fetch_sub(1, Ordering::SeqCst);
            return true;
        }

        match self.target.lock().unwrap().take() {
            Some(res) => {
                res.complete(Ok(7));
                true
            }
            None => false,
        }
    }

    fn poll_all(&self) {}
}

#[test]
fn test_unrelated_messages_are_served_back_to_back() {
    init();

    let conn = Arc::new(Backlog {
        backlog: AtomicUsize::new(20),
        target: Mutex::new(None),
    });

    let res: PendingResult<u32, ()> = Builder::new()
        .poll_interval(Duration::from_millis(50))
        .expiry(Duration::from_secs(5))
        .build(&conn);
    *conn.target.lock().unwrap() = Some(res.clone());

    let start = Instant::now();
    assert_eq!(res.value(), Ok(7));

    // One idle slice per unrelated reply would take a full second
    assert!(start.elapsed() < Duration::from_millis(50));
    assert_eq!(conn.backlog.load(Ordering::SeqCst), 0);
}

#[test]
fn test_late_completion_ignored() {
    init();

    let conn = Arc::new(Quiet);
    let res = PendingResult::<u32, ()>::new(&conn);
    res.set_expiry(Some(Duration::from_millis(10)));

    thread::sleep(Duration::from_millis(15));
    assert!(res.is_expired());

    res.complete(Ok(1));
    assert!(!res.is_ready());
    assert!(!res.is_error());
    assert_eq!(res.value(), Err(Error::Expired));
    assert_eq!(format!("{:?}", res), "PendingResult(<unnamed>, expired)");
}

#[test]
fn test_completion_before_expiry() {
    init();

    let conn = Arc::new(Quiet);
    let res = PendingResult::<u32, ()>::new(&conn);
    res.set_expiry(Some(Duration::from_secs(5)));

    let h = {
        let res = res.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            res.complete(Ok(6));
        })
    };

    assert_eq!(res.value(), Ok(6));
    assert!(!res.is_expired());

    h.join().unwrap();
}

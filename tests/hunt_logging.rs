//! Log output of the retry loop
//!
//! Installs a capturing logger for this test binary and checks what an
//! operator reading the log sees on success and on a configuration stop.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{LevelFilter, Log, Metadata, Record};
use reservator::hunt::{Hunter, RecordingSleeper, RetryPolicy};
use reservator::launch::{LaunchError, LaunchOutcome, LaunchRequest, LaunchedInstance, MockLaunchService};

static LINES: Mutex<Vec<String>> = Mutex::new(Vec::new());

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("reservator")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            LINES.lock().unwrap().push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

fn take_lines() -> Vec<String> {
    std::mem::take(&mut *LINES.lock().unwrap())
}

fn request() -> LaunchRequest {
    LaunchRequest {
        compartment_id: "ocid1.compartment.oc1..aaa".to_string(),
        availability_domain: "Uocm:EU-FRANKFURT-1-AD-1".to_string(),
        display_name: "ampere-free".to_string(),
        shape: "VM.Standard.A1.Flex".to_string(),
        ocpus: 4.0,
        memory_in_gbs: 24.0,
        image_id: "ocid1.image.oc1..bbb".to_string(),
        subnet_id: "ocid1.subnet.oc1..ccc".to_string(),
        assign_public_ip: true,
        ssh_public_key: "ssh-ed25519 AAAA test".to_string(),
    }
}

async fn run(outcomes: Vec<LaunchOutcome>) {
    let hunter = Hunter::new(
        Arc::new(MockLaunchService::new(outcomes)),
        RecordingSleeper::new(),
        RetryPolicy::new(Duration::from_secs(60)),
    );
    hunter.run(&request()).await;
}

/// Both scenarios share one test so the global logger sees them in order
#[tokio::test]
async fn test_hunt_log_lines() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    // Success names the instance
    run(vec![Ok(LaunchedInstance {
        id: "ocid1.instance.test.1".to_string(),
        lifecycle_state: "RUNNING".to_string(),
        display_name: "ampere-free".to_string(),
    })])
    .await;

    let lines = take_lines();
    let success = lines.iter().position(|l| l.contains("SUCCESS")).unwrap();
    let after_success = lines[success..].join("\n");
    assert!(after_success.contains("ocid1.instance.test.1"));
    assert!(after_success.contains("RUNNING"));
    assert!(after_success.contains("ampere-free"));

    // A 401 logs exactly one critical line after the attempt, then nothing
    run(vec![
        Err(LaunchError::service(401, "NotAuthenticated", "The required information to complete authentication was not provided")),
        Ok(LaunchedInstance {
            id: "ocid1.instance.never".to_string(),
            lifecycle_state: "RUNNING".to_string(),
            display_name: "ampere-free".to_string(),
        }),
    ])
    .await;

    let lines = take_lines();
    let attempt = lines.iter().position(|l| l == "Attempt #1...").unwrap();
    let after_attempt = &lines[attempt + 1..];
    assert_eq!(after_attempt.len(), 1, "unexpected lines: {:?}", after_attempt);
    assert!(after_attempt[0].contains("Critical error on attempt #1"));
    assert!(after_attempt[0].contains("401"));
    assert!(after_attempt[0].contains("Stopping"));
    assert!(!lines.iter().any(|l| l.contains("Attempt #2")));
}

//! Integration tests for the session lifecycle.
//!
//! hashcat is replaced by shell scripts that print status lines, recovery
//! lines and exit codes the way the real tool does.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use hashcrack_core::{DigestHasher, Error, ServerConfig, SessionId, SessionSnapshot, SessionStatus};
use hashcrack_launcher::testing::ScriptLauncher;
use hashcrack_launcher::HashcatLauncher;
use hashcrack_session::SessionManager;

const PASSWORD_MD5: &str = "5f4dcc3b5aa765d61d8327deb882cf99";

fn manager_for(script: &str) -> SessionManager {
    SessionManager::new(
        ServerConfig::default(),
        Arc::new(ScriptLauncher::new(script)),
        Arc::new(DigestHasher::default()),
    )
}

/// Poll until `pred` holds, failing after a few seconds.
async fn wait_until<F>(manager: &SessionManager, id: &SessionId, pred: F) -> SessionSnapshot
where
    F: Fn(&SessionSnapshot) -> bool,
{
    for _ in 0..500 {
        let snapshot = manager.query(id).unwrap();
        if pred(&snapshot) {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition never held for session {id}: {:?}", manager.query(id));
}

#[tokio::test]
async fn test_start_reports_running_immediately() {
    let manager = manager_for("sleep 5");

    let id = manager.start_with_hash(PASSWORD_MD5, 0).unwrap();
    let snapshot = manager.query(&id).unwrap();

    assert_eq!(snapshot.id, id);
    assert_eq!(snapshot.target_hash, PASSWORD_MD5);
    assert_eq!(snapshot.status, SessionStatus::Running);
    assert_eq!(snapshot.progress_percent, 0);
    assert!(!snapshot.recovered);
    assert_eq!(snapshot.original_password, None);

    manager.stop(&id).unwrap();
}

#[tokio::test]
async fn test_progress_line_updates_only_progress() {
    let manager = manager_for("echo 'Progress.........: 42%'; sleep 5");
    let id = manager.start_with_hash(PASSWORD_MD5, 0).unwrap();

    let snapshot = wait_until(&manager, &id, |s| s.progress_percent == 42).await;
    assert_eq!(snapshot.status, SessionStatus::Running);
    assert_eq!(snapshot.speed, None);
    assert_eq!(snapshot.temperature, None);
    assert!(!snapshot.recovered);

    manager.stop(&id).unwrap();
}

#[tokio::test]
async fn test_status_block_updates_all_fields() {
    let script = r#"
printf 'Status...........: Running\n'
printf 'Speed.#1.........:  1234.5 kH/s (0.52ms) @ Accel:1024\n'
printf 'Progress.........: 7172192/14344385 (50.00%%)\n'
printf 'Hardware.Mon.#1..: Temp: 65c Fan: 33%% Util: 99%%\n'
sleep 5
"#;
    let manager = manager_for(script);
    let id = manager.start_with_hash(PASSWORD_MD5, 0).unwrap();

    let snapshot = wait_until(&manager, &id, |s| s.temperature.is_some()).await;
    assert_eq!(snapshot.progress_percent, 50);
    assert_eq!(snapshot.speed.as_deref(), Some("1234.5 kH/s"));
    assert_eq!(snapshot.temperature, Some(65));
    assert_eq!(snapshot.status, SessionStatus::Running);

    manager.stop(&id).unwrap();
}

#[tokio::test]
async fn test_recovery_line_completes_session() {
    let manager = manager_for("echo \"$HASHCRACK_TARGET:password\"; sleep 5");
    let id = manager.start_with_hash(PASSWORD_MD5, 0).unwrap();

    let snapshot = wait_until(&manager, &id, |s| s.recovered).await;
    assert_eq!(snapshot.original_password.as_deref(), Some("password"));
    assert_eq!(snapshot.status, SessionStatus::Completed);

    // The process is still live; stopping it does not undo the recovery
    let stopped = manager.stop(&id).unwrap();
    assert_eq!(stopped.status, SessionStatus::Completed);
    assert!(stopped.recovered);
}

#[tokio::test]
async fn test_recovery_survives_nonzero_exit() {
    // hashcat exits 1 when the wordlist is exhausted, after printing cracks
    let manager = manager_for("echo \"$HASHCRACK_TARGET:hunter2\"; exit 1");
    let id = manager.start_with_hash(PASSWORD_MD5, 0).unwrap();

    let snapshot = wait_until(&manager, &id, |s| s.exit_code.is_some()).await;
    assert_eq!(snapshot.status, SessionStatus::Completed);
    assert!(snapshot.recovered);
    assert_eq!(snapshot.original_password.as_deref(), Some("hunter2"));
    assert_eq!(snapshot.exit_code, Some(1));
}

#[tokio::test]
async fn test_stop_is_not_overridden_by_exit() {
    // Exits cleanly on SIGTERM, once the trap is installed
    let manager = manager_for(
        "trap 'exit 0' TERM; echo 'Progress.........: 1%'; while true; do sleep 0.05; done",
    );
    let id = manager.start_with_hash(PASSWORD_MD5, 0).unwrap();
    wait_until(&manager, &id, |s| s.progress_percent == 1).await;

    let stopped = manager.stop(&id).unwrap();
    assert_eq!(stopped.status, SessionStatus::Stopped);

    let snapshot = wait_until(&manager, &id, |s| s.exit_code.is_some()).await;
    assert_eq!(snapshot.exit_code, Some(0));
    assert_eq!(snapshot.status, SessionStatus::Stopped);
}

#[tokio::test]
async fn test_stop_while_output_open_keeps_exit_status() {
    // The shell exits at once; its background child keeps stdout open
    let manager = manager_for("(sleep 1) & exit 1");
    let id = manager.start_with_hash(PASSWORD_MD5, 0).unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    let after_stop = manager.stop(&id).unwrap();
    assert_ne!(after_stop.status, SessionStatus::Stopped);

    let snapshot = wait_until(&manager, &id, |s| s.exit_code.is_some()).await;
    assert_eq!(snapshot.exit_code, Some(1));
    assert_eq!(snapshot.status, SessionStatus::Failed);
}

#[tokio::test]
async fn test_stop_twice_is_noop() {
    let manager = manager_for("sleep 5");
    let id = manager.start_with_hash(PASSWORD_MD5, 0).unwrap();

    let first = manager.stop(&id).unwrap();
    let second = manager.stop(&id).unwrap();
    assert_eq!(first.status, SessionStatus::Stopped);
    assert_eq!(second.status, SessionStatus::Stopped);
}

#[tokio::test]
async fn test_stop_unknown_session() {
    let manager = manager_for("sleep 5");
    let id = manager.start_with_hash(PASSWORD_MD5, 0).unwrap();
    let before = manager.list_all();

    let missing = SessionId::new();
    let err = manager.stop(&missing).unwrap_err();
    assert!(matches!(err, Error::SessionNotFound(m) if m == missing));
    assert!(matches!(manager.query(&missing), Err(Error::SessionNotFound(_))));

    let after = manager.list_all();
    assert_eq!(before.len(), after.len());
    assert_eq!(after[0].status, SessionStatus::Running);

    manager.stop(&id).unwrap();
}

#[tokio::test]
async fn test_exit_failure_without_recovery() {
    let manager = manager_for("echo 'Progress.........: 100%'; exit 1");
    let id = manager.start_with_hash(PASSWORD_MD5, 0).unwrap();

    let snapshot = wait_until(&manager, &id, |s| s.status.is_terminal()).await;
    assert_eq!(snapshot.status, SessionStatus::Failed);
    assert_eq!(snapshot.exit_code, Some(1));
    assert!(!snapshot.recovered);
    assert_eq!(snapshot.progress_percent, 100);
}

#[tokio::test]
async fn test_stop_after_exit_keeps_final_status() {
    let manager = manager_for("exit 0");
    let id = manager.start_with_hash(PASSWORD_MD5, 0).unwrap();

    wait_until(&manager, &id, |s| s.status.is_terminal()).await;
    let snapshot = manager.stop(&id).unwrap();
    assert_eq!(snapshot.status, SessionStatus::Completed);
}

#[tokio::test]
async fn test_foreign_recovery_line_is_ignored() {
    let script = "echo 'e10adc3949ba59abbe56e057f20f883e:123456'; \
                  echo \"$HASHCRACK_TARGET\"; exit 1";
    let manager = manager_for(script);
    let id = manager.start_with_hash(PASSWORD_MD5, 0).unwrap();

    let snapshot = wait_until(&manager, &id, |s| s.status.is_terminal()).await;
    assert_eq!(snapshot.status, SessionStatus::Failed);
    assert!(!snapshot.recovered);
    assert_eq!(snapshot.original_password, None);
}

#[tokio::test]
async fn test_stderr_is_not_parsed() {
    let manager = manager_for("echo \"$HASHCRACK_TARGET:password\" >&2; exit 1");
    let id = manager.start_with_hash(PASSWORD_MD5, 0).unwrap();

    let snapshot = wait_until(&manager, &id, |s| s.status.is_terminal()).await;
    assert_eq!(snapshot.status, SessionStatus::Failed);
    assert!(!snapshot.recovered);
}

#[tokio::test]
async fn test_launch_failure_registers_nothing() {
    let manager = SessionManager::new(
        ServerConfig::default(),
        Arc::new(ScriptLauncher::with_shell("/nonexistent/sh", "exit 0")),
        Arc::new(DigestHasher::default()),
    );

    let err = manager.start_with_hash(PASSWORD_MD5, 0).unwrap_err();
    assert!(matches!(err, Error::Launch(_)));
    assert!(manager.list_all().is_empty());
}

#[tokio::test]
async fn test_ids_are_fresh() {
    let mut config = ServerConfig::default();
    config.server.max_running_sessions = 100;
    let manager = SessionManager::new(
        config,
        Arc::new(ScriptLauncher::new("exit 0")),
        Arc::new(DigestHasher::default()),
    );

    let ids: Vec<_> = (0..20)
        .map(|_| manager.start_with_hash(PASSWORD_MD5, 0).unwrap())
        .collect();
    let unique: HashSet<_> = ids.iter().collect();

    assert_eq!(unique.len(), ids.len());
    assert_eq!(manager.list_all().len(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sessions_are_independent() {
    let manager = Arc::new(manager_for(
        "i=0; while [ $i -le 100 ]; do echo \"Progress.........: $i%\"; i=$((i+10)); done; \
         echo \"$HASHCRACK_TARGET:secret-$HASHCRACK_HASH_TYPE\"; exit 0",
    ));

    let ids: Vec<_> = (0..8)
        .map(|_| manager.start("password", 0).unwrap())
        .collect();

    // Readers run while output is being applied
    let reader = {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move {
            for _ in 0..50 {
                for s in manager.list_all() {
                    assert!(!s.recovered || s.status == SessionStatus::Completed);
                    assert!(s.progress_percent <= 100);
                }
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
    };

    for id in &ids {
        let snapshot = wait_until(&manager, id, |s| s.exit_code.is_some()).await;
        assert_eq!(snapshot.status, SessionStatus::Completed);
        assert!(snapshot.recovered);
        assert_eq!(snapshot.original_password.as_deref(), Some("secret-0"));
        assert_eq!(snapshot.progress_percent, 100);
    }

    reader.await.unwrap();
}

#[tokio::test]
async fn test_snapshot_serializes_without_handle() {
    let manager = manager_for("sleep 5");
    let id = manager.start("password", 0).unwrap();

    let json = serde_json::to_value(manager.query(&id).unwrap()).unwrap();
    assert_eq!(json["status"], "running");
    assert_eq!(json["targetHash"], PASSWORD_MD5);
    assert_eq!(json["progressPercent"], 0);
    assert!(json.get("terminator").is_none());
    assert!(json.get("processHandle").is_none());

    manager.stop(&id).unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_hashcat_launcher_end_to_end() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();

    // Stand-in for hashcat: prints a crack for whatever the hash file holds.
    // The hash file is the second to last argument.
    let fake = dir.path().join("fake-hashcat");
    std::fs::write(
        &fake,
        "#!/bin/sh\n\
         prev=''; cur=''\n\
         for a in \"$@\"; do prev=\"$cur\"; cur=\"$a\"; done\n\
         echo 'Progress.........: 100%'\n\
         echo \"$(cat \"$prev\"):password\"\n\
         exit 0\n",
    )
    .unwrap();
    std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut config = ServerConfig::default();
    config.cracker.bin_path = fake.display().to_string();
    config.cracker.work_dir = dir.path().join("work");

    let manager = SessionManager::new(
        config.clone(),
        Arc::new(HashcatLauncher::new(config.cracker.clone())),
        Arc::new(DigestHasher::new(config.hashing.clone())),
    );

    let id = manager.start("password", 0).unwrap();
    assert!(config.cracker.hash_file(&id.to_string()).exists());

    let snapshot = wait_until(&manager, &id, |s| s.exit_code.is_some()).await;
    assert_eq!(snapshot.target_hash, PASSWORD_MD5);
    assert_eq!(snapshot.status, SessionStatus::Completed);
    assert!(snapshot.recovered);
    assert_eq!(snapshot.original_password.as_deref(), Some("password"));
    assert_eq!(snapshot.progress_percent, 100);
}

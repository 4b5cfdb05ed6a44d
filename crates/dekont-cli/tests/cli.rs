use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const RECEIPT: &str = "T. HALK BANKASI A.Ş.\n\
                       GÖNDEREN : Ahmet Kaya\n\
                       ALICI : Mehmet Yılmaz\n\
                       İŞLEM TUTARI (TL) : 2,500.00\n\
                       İŞLEM TARİHİ : 15.07.2025\n\
                       AÇIKLAMA : Kira ödemesi\n";

fn dekont(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dekont").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

/// Temp dir holding a default config file.
fn workspace() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{}").unwrap();
    (dir, config)
}

#[test]
fn test_process_text_file() {
    let (dir, config) = workspace();
    let input = dir.path().join("receipt.txt");
    fs::write(&input, RECEIPT).unwrap();

    dekont(&config)
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(
            "Açıklama: Kira ödemesi\n\
             Alıcı: Mehmet Yılmaz\n\
             Gönderen: Ahmet Kaya\n\
             İşlem Tutarı: 2,500.00 TL\n\
             İşlem Tarihi: 15.07.2025\n",
        );
}

#[test]
fn test_process_stdin_markdown() {
    let (_dir, config) = workspace();

    dekont(&config)
        .args(["process", "-", "--format", "markdown"])
        .write_stdin("ALICI: Test User\nTUTAR: 100.50 TL\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("📄 **Dekont Bilgileri:**\n\n"))
        .stdout(predicate::str::contains("**Alıcı**: Test User\n**İşlem Tutarı**: 100.50 TL"));
}

#[test]
fn test_process_json_reports_sources() {
    let (_dir, config) = workspace();

    dekont(&config)
        .args(["process", "-", "--format", "json"])
        .write_stdin("Some text 250.75 TL more text")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"amount\": \"250.75\""))
        .stdout(predicate::str::contains("\"amount_scan\""))
        .stdout(predicate::str::contains("\"confidence\": 0.5"))
        .stdout(predicate::str::contains("\"matched\": \"250.75 TL\""));
}

#[test]
fn test_process_nothing_recognized_prints_nothing() {
    let (_dir, config) = workspace();

    dekont(&config)
        .args(["process", "-"])
        .write_stdin("Some random text without proper fields")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No transaction fields recognized"));
}

#[test]
fn test_process_explain() {
    let (_dir, config) = workspace();

    dekont(&config)
        .args(["process", "-", "--explain"])
        .write_stdin("GÖNDEREN KİŞİ: Can Özkan\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Kuveyt Türk profile"))
        .stderr(predicate::str::contains("0.95"))
        .stderr(predicate::str::contains("\"GÖNDEREN KİŞİ: Can Özkan\""))
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_process_oversized_file_is_skipped() {
    let (dir, _) = workspace();
    let config = dir.path().join("small.json");
    fs::write(&config, r#"{"pdf": {"max_file_size_mb": 1}}"#).unwrap();

    let input = dir.path().join("big.txt");
    let mut text = RECEIPT.to_string();
    text.push_str(&"x".repeat(2 * 1024 * 1024));
    fs::write(&input, text).unwrap();

    dekont(&config)
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Skipped"));
}

#[test]
fn test_process_missing_file_fails() {
    let (dir, config) = workspace();

    dekont(&config)
        .arg("process")
        .arg(dir.path().join("missing.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_process_rejects_unknown_bank() {
    let (_dir, config) = workspace();

    dekont(&config)
        .args(["process", "-", "--banks", "ziraat"])
        .write_stdin(RECEIPT)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown bank"));
}

#[test]
fn test_batch_writes_summary() {
    let (dir, config) = workspace();
    let inputs = dir.path().join("in");
    fs::create_dir(&inputs).unwrap();
    fs::write(inputs.join("a.txt"), RECEIPT).unwrap();
    fs::write(inputs.join("b.txt"), "nothing here").unwrap();
    let out = dir.path().join("out");

    dekont(&config)
        .arg("batch")
        .arg(format!("{}/*.txt", inputs.display()))
        .arg("--output-dir")
        .arg(&out)
        .arg("--summary")
        .args(["--jobs", "2"])
        .assert()
        .success();

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,description,recipient,sender,amount,date"));
    assert!(summary.contains(
        "a.txt,success,Kira ödemesi,Mehmet Yılmaz,Ahmet Kaya,\"2,500.00\",15.07.2025"
    ));
    assert!(summary.contains("b.txt,empty,"));

    assert!(out.join("a.txt").exists());
    assert!(!out.join("b.txt").exists());
}

#[test]
fn test_banks_lists_registry_in_order() {
    let (_dir, config) = workspace();

    let output = dekont(&config).arg("banks").output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();

    let positions: Vec<usize> = ["VakıfBank", "Yapı Kredi", "Kuveyt Türk", "HalkBank", "Generic"]
        .iter()
        .map(|name| stdout.find(name).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(stdout.contains("GİDEN EFT TUTARI"));
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nested").join("config.json");

    dekont(&config)
        .args(["config", "set", "pdf.max_file_size_mb", "5"])
        .assert()
        .success();

    dekont(&config)
        .args(["config", "get", "pdf.max_file_size_mb"])
        .assert()
        .success()
        .stdout("5\n");

    dekont(&config)
        .args(["config", "set", "pdf.no_such_key", "1"])
        .assert()
        .failure();
}

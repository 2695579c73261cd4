use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn hub_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_hub"))
}

/// A localhost port with nothing listening on it.
fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let content = r#"{
  "blogposts": [
    { "_id": "post-b", "title": "Lead Gen with WhatsApp", "author": "Team", "publishDate": "2024-05-01" },
    { "_id": "post-a", "title": "LinkedIn Automation 101" },
    { "_id": "post-c", "excerpt": "no title here" }
  ],
  "faqs": [
    { "_id": "f1", "question": "How long does setup take?", "answer": "About a week.", "category": "Onboarding", "displayOrder": 2 },
    { "_id": "f2", "question": "Do you offer refunds?", "answer": "Within 14 days.", "category": "Billing", "displayOrder": 1, "isFeatured": true },
    { "_id": "f3", "question": "Which channels are supported?", "answer": "WhatsApp, Messenger, web.", "category": "Onboarding", "displayOrder": 1 }
  ],
  "testimonials": [ { "_id": "t1", "clientName": "Meera" } ],
  "services": [ { "_id": "s1", "serviceName": "Chatbots" }, { "_id": "s2", "serviceName": "Ads" } ],
  "solutions": [ { "_id": "sol1", "title": "Clinic Automation", "keyBenefits": "Fewer no-shows\n\n24/7 booking\nWhatsApp reminders\nCRM sync" } ],
  "casestudies": [ { "_id": "c1", "title": "Clinic bookings" } ],
  "teammembers": [ { "_id": "m1", "memberName": "Swadhin Roy", "memberRole": "Founder" } ],
  "pricingplans": [ { "_id": "p1", "planName": "Starter", "monthlyPrice": 2999 } ]
}"#;
    fs::write(root.join("content.json"), content).unwrap();

    let config_content = format!(
        r#"[store]
provider = "file"
path = "{root}/content.json"

[chat]
webhook_url = "http://127.0.0.1:{chat_port}/webhook/chat"
timeout_secs = 5

[contact]
webhook_url = "http://127.0.0.1:{contact_port}/webhook/contact"
timeout_secs = 5

[session]
path = "{root}/data/session.json"
"#,
        root = root.display(),
        chat_port = closed_port(),
        contact_port = closed_port(),
    );

    let config_path = config_dir.join("hub.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_hub(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    run_hub_with_log(config_path, args, None)
}

fn run_hub_with_log(
    config_path: &Path,
    args: &[&str],
    rust_log: Option<&str>,
) -> (String, String, bool) {
    let binary = hub_binary();
    let mut command = Command::new(&binary);
    match rust_log {
        Some(filter) => command.env("RUST_LOG", filter),
        None => command.env_remove("RUST_LOG"),
    };
    let output = command
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run hub binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_list_preserves_store_order() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_hub(&config_path, &["list", "blogposts"]);
    assert!(success, "list failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("3 records"));

    let b = stdout.find("post-b").unwrap();
    let a = stdout.find("post-a").unwrap();
    let c = stdout.find("post-c").unwrap();
    assert!(b < a && a < c, "order changed: {}", stdout);
    assert!(stdout.contains("(untitled)"));
}

#[test]
fn test_list_limit() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_hub(&config_path, &["list", "blogposts", "--limit", "2"]);
    assert!(success);
    assert!(stdout.contains("2 records"));
    assert!(!stdout.contains("post-c"));
}

#[test]
fn test_list_json() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_hub(&config_path, &["list", "services", "--json"]);
    assert!(success);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let items = value["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["serviceName"], "Chatbots");
}

#[test]
fn test_list_unknown_collection() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_hub(&config_path, &["list", "nonexistent"]);
    assert!(!success);
    assert!(stderr.contains("unknown collection"), "stderr: {}", stderr);
}

#[test]
fn test_get_record() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_hub(&config_path, &["get", "blogposts", "post-a"]);
    assert!(success, "get failed: {}", stderr);
    assert!(stdout.contains("LinkedIn Automation 101"));
    assert!(stdout.contains("_id"));
}

#[test]
fn test_get_missing_record() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_hub(&config_path, &["get", "blogposts", "missing-id"]);
    assert!(!success);
    assert!(stderr.contains("not found"), "stderr: {}", stderr);
}

#[test]
fn test_faqs_featured_first_then_display_order() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_hub(&config_path, &["faqs"]);
    assert!(success);
    assert!(stdout.contains("categories: All, Billing, Onboarding"));

    let refunds = stdout.find("Do you offer refunds?").unwrap();
    let channels = stdout.find("Which channels are supported?").unwrap();
    let setup = stdout.find("How long does setup take?").unwrap();
    assert!(refunds < channels && channels < setup, "order: {}", stdout);
}

#[test]
fn test_faqs_category_filter() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_hub(&config_path, &["faqs", "--category", "Billing"]);
    assert!(success);
    assert!(stdout.contains("Do you offer refunds?"));
    assert!(!stdout.contains("How long does setup take?"));
}

#[test]
fn test_home_counts() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_hub(&config_path, &["home"]);
    assert!(success, "home failed: {}", stderr);
    assert!(stdout.contains("blog posts:    3"));
    assert!(stdout.contains("services:      2"));
    assert!(stdout.contains("solutions:     1"));
}

#[test]
fn test_blog_index() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_hub(&config_path, &["blog"]);
    assert!(success, "blog failed: {}", stderr);
    assert!(stdout.contains("Lead Gen with WhatsApp"));
    assert!(stdout.contains("by Team on May 1, 2024"));
    assert!(stdout.contains("(untitled)"));
}

#[test]
fn test_team_initials() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_hub(&config_path, &["team"]);
    assert!(success);
    assert!(stdout.contains("[SR]"));
    assert!(stdout.contains("Founder"));
}

#[test]
fn test_solutions_show_first_three_benefit_lines() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_hub(&config_path, &["solutions"]);
    assert!(success);
    assert!(stdout.contains("  - Fewer no-shows"));
    assert!(stdout.contains("  - 24/7 booking"));
    assert!(!stdout.contains("WhatsApp reminders"));
    assert!(!stdout.contains("CRM sync"));
}

#[test]
fn test_session_reused_until_reset() {
    let (_tmp, config_path) = setup_test_env();

    let (first, _, ok1) = run_hub(&config_path, &["session", "show"]);
    let (second, _, ok2) = run_hub(&config_path, &["session", "show"]);
    assert!(ok1 && ok2);
    assert!(first.trim().starts_with("session_"));
    assert_eq!(first, second);

    let (stdout, _, ok) = run_hub(&config_path, &["session", "reset"]);
    assert!(ok);
    assert!(stdout.contains("cleared"));

    let (third, _, _) = run_hub(&config_path, &["session", "show"]);
    assert_ne!(first, third);
}

#[test]
fn test_default_log_filter_hides_info() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_hub_with_log(&config_path, &["session", "show"], None);
    assert!(success);
    assert!(!stderr.contains("created chat session"), "stderr: {}", stderr);
}

#[test]
fn test_rust_log_enables_info() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) =
        run_hub_with_log(&config_path, &["session", "show"], Some("digital_hub=info"));
    assert!(success);
    assert!(stderr.contains("created chat session"), "stderr: {}", stderr);
}

#[test]
fn test_chat_unreachable_webhook_prints_apology() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_hub(&config_path, &["chat", "--message", "hello"]);
    assert!(success, "chat failed: {}", stderr);
    assert!(stdout.contains("Sorry, I encountered an error"));
    assert!(stdout.contains("info@swadhindigitalhub.com"));
}

#[test]
fn test_chat_blank_message_is_silent() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_hub(&config_path, &["chat", "--message", "   "]);
    assert!(success);
    assert!(stdout.trim().is_empty(), "stdout: {}", stdout);
}

#[test]
fn test_contact_unreachable_webhook_fails() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_hub(
        &config_path,
        &[
            "contact",
            "--name",
            "Asha",
            "--email",
            "asha@example.com",
            "--message",
            "Need a chatbot",
        ],
    );
    assert!(!success);
    assert!(stderr.contains("Failed to send message"), "stderr: {}", stderr);
}

#[test]
fn test_contact_rejects_invalid_email() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_hub(
        &config_path,
        &["contact", "--name", "A", "--email", "nope", "--message", "hi"],
    );
    assert!(!success);
    assert!(stderr.contains("invalid email"));
}

#[test]
fn test_invalid_config_errors() {
    let (tmp, _) = setup_test_env();
    let bad = tmp.path().join("bad.toml");
    fs::write(&bad, "[store]\nprovider = \"ftp\"\n").unwrap();

    let (_, stderr, success) = run_hub(&bad, &["list", "faqs"]);
    assert!(!success);
    assert!(stderr.contains("Unknown store provider"));
}

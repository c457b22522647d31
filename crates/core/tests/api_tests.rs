//! Library API integration tests
use docnorm_core::*;
use tempfile::TempDir;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn get_doc_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/docs/{}", name)
}

fn load_doc(name: &str) -> RawDocument {
    FileSource::new(get_doc_fixture_path(name)).load().expect("fixture should load")
}

#[test]
fn test_assemble_networking_guide() {
    let record = assemble(&load_doc("networking_guide.txt"));

    assert_eq!(record.title.as_deref(), Some("OpenShift4.12 Networking Guide"));
    assert_eq!(record.version.as_deref(), Some("4.12"));

    let headings: Vec<_> = record.sections.iter().map(|s| s.heading.as_str()).collect();
    assert_eq!(
        headings,
        vec![
            "Main Content",
            "1 About networking",
            "1.1 Checking pod connectivity",
            "2 Configuring DNS",
            "Appendix A. Troubleshooting",
        ]
    );

    assert_eq!(
        record.commands,
        vec![
            "$ oc get pods -n openshift-dns",
            "$ oc edit dns.operator/default",
            "kubectl logs -n openshift-dns ds/dns-default",
        ]
    );
}

#[test]
fn test_boilerplate_absent_from_record() {
    let record = assemble(&load_doc("networking_guide.txt"));
    let json = record.to_json_line().unwrap();

    assert!(!json.contains("Legal Notice"));
    assert!(!json.contains("CC-BY-SA"));
    assert!(!json.contains("Table of Contents"));
}

#[test]
fn test_assemble_release_notes() {
    let record = assemble(&load_doc("amq_release_notes.txt"));

    assert_eq!(record.title.as_deref(), Some("AMQ Broker 2024.Q2 Release Notes"));
    assert_eq!(record.version.as_deref(), Some("2024.Q2"));
    assert_eq!(
        record.commands,
        vec![
            "> artemis queue stat --url tcp://localhost:61616",
            "Run mvn clean install in the examples directory to rebuild the clients.",
        ]
    );

    let json = record.to_json_line().unwrap();
    assert!(!json.contains("Downloads"));
    assert!(!json.contains("All rights reserved"));
}

#[test]
fn test_assemble_faq_without_headings() {
    let record = assemble(&load_doc("reset_password_faq.txt"));

    assert_eq!(record.title.as_deref(), Some("How do I reset the MySQL root password?"));
    assert_eq!(record.version, None);
    assert_eq!(record.sections.len(), 1);
    assert_eq!(record.sections[0].heading, MAIN_CONTENT_HEADING);
    assert!(record.sections[0].content.starts_with("How do I reset"));
    assert!(record.commands.is_empty());
}

#[test]
fn test_title_scenario() {
    assert_eq!(extract_title("Home Products OpenShift 4.12 Networking Guide Open in new tab"), "OpenShift4.12 Networking Guide");
    assert_eq!(extract_title(""), "Untitled");
}

#[test]
fn test_segment_scenario() {
    let sections = segment("3.2 Installing the Operator\nOpen the console.\n3.3 Configuring\nEdit the CR.");
    assert_eq!(
        sections,
        vec![
            Section::new("3.2 Installing the Operator", "Open the console."),
            Section::new("3.3 Configuring", "Edit the CR."),
        ]
    );
}

#[test]
fn test_strip_legal_notice() {
    let cleaned = strip_boilerplate("Intro\n\nLegal Notice\nAll content licensed.\n\nBody text");
    assert!(!cleaned.contains("Legal Notice"));
    assert!(!cleaned.contains("licensed"));
    assert!(cleaned.contains("Body text"));
}

#[test]
fn test_directory_batch_round_trip() {
    let sources = list_documents(get_fixture_path("docs"), "txt").unwrap();
    assert_eq!(sources.len(), 3);

    let pool = WorkerPool::new(2, 2).unwrap();
    let report = run_batch(&pool, &Normalizer::default(), &sources);
    assert!(report.is_clean());

    let mut buffer = Vec::new();
    let written = write_records(&mut buffer, &report.records).unwrap();
    assert_eq!(written, 3);

    let output = String::from_utf8(buffer).unwrap();
    let mut parsed: Vec<DocumentRecord> =
        output.lines().map(|line| DocumentRecord::from_json_line(line).unwrap()).collect();
    let mut expected = report.records.clone();

    parsed.sort_by(|a, b| a.title.cmp(&b.title));
    expected.sort_by(|a, b| a.title.cmp(&b.title));
    assert_eq!(parsed, expected);
}

#[test]
fn test_batch_partial_failure() {
    let tmp = TempDir::new().unwrap();
    let mut sources = Vec::new();
    for n in 1..=10 {
        let path = tmp.path().join(format!("{}.txt", n));
        if n != 4 {
            std::fs::write(&path, format!("Document {}\n\n1 Body\ntext", n)).unwrap();
        }
        sources.push(FileSource::new(path));
    }

    let pool = WorkerPool::new(4, 3).unwrap();
    let report = run_batch(&pool, &Normalizer::default(), &sources);

    assert_eq!(report.records.len(), 9);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].id.ends_with("4.txt"));
}

#[test]
fn test_crawl_feed() {
    let lines = read_feed(get_fixture_path("crawl_feed.jsonl")).unwrap();
    assert_eq!(lines.len(), 5);

    let pool = WorkerPool::new(2, 8).unwrap();
    let normalizer = Normalizer::for_profile(Profile::Crawl);
    let report = run_pages(&pool, &normalizer, &lines);

    assert_eq!(report.records.len(), 3);
    let mut failed: Vec<_> = report.failures.iter().map(|f| f.id.clone()).collect();
    failed.sort();
    assert_eq!(failed, vec!["line 5", "line 6"]);

    let storage = report.records.iter().find(|r| r.url.ends_with("/storage")).unwrap();
    assert_eq!(storage.title.as_deref(), Some("Managing storage devices"));
    assert_eq!(storage.version.as_deref(), Some("9.2"));
    assert_eq!(
        storage.commands,
        Some(vec!["systemctl enable --now stratisd".to_string(), "yum install stratisd".to_string()])
    );
    let content = storage.content.as_deref().unwrap();
    assert!(!content.contains("Document ID"));
    assert!(!content.contains("Back to top"));
    assert!(!content.contains("Terms apply"));

    let install = report.records.iter().find(|r| r.url.ends_with("/install")).unwrap();
    assert_eq!(install.version.as_deref(), Some("4.14"));
    assert_eq!(install.commands, Some(vec!["$ oc adm release mirror".to_string()]));

    let empty = report.records.iter().find(|r| r.url.ends_with("/empty")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&empty.to_json_line().unwrap()).unwrap();
    assert!(json["content"].is_null());
    assert!(json["commands"].is_null());
    assert_eq!(json["title"], "Placeholder page");
}

#[test]
fn test_repair_fixture() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("fixed.jsonl");

    let report = repair_file(get_fixture_path("broken_records.jsonl"), &output).unwrap();
    assert_eq!(report.kept, 1);
    assert_eq!(report.repaired, 2);
    assert_eq!(report.dropped, vec![4]);

    let fixed = std::fs::read_to_string(&output).unwrap();
    assert!(fixed.lines().any(|line| line == r#"{"content": "he said \"hi\""}"#));

    for line in fixed.lines() {
        assert_eq!(repair(line).as_deref(), Some(line));
    }
}

#[test]
fn test_rules_file_extends_tables() {
    let rules = RuleParser::parse_file(get_fixture_path("rules.txt")).unwrap();
    let config = NormalizeConfig::builder().rules(&rules).build();
    let normalizer = Normalizer::new(&config).unwrap();

    let text = std::fs::read_to_string(get_fixture_path("docs_with_rules.txt")).unwrap();
    let record = normalizer.assemble(&RawDocument::new("docs_with_rules.txt", text.clone()));

    let headings: Vec<_> = record.sections.iter().map(|s| s.heading.as_str()).collect();
    assert_eq!(headings, vec!["Main Content", "Step 1: Pull the image", "Step 2: Run it"]);
    assert_eq!(record.commands, vec!["podman pull registry.example.com/app:1.2", "podman run -d app"]);

    let json = record.to_json_line().unwrap();
    assert!(!json.contains("Feedback"));
    assert!(!json.contains("Was this page helpful"));

    let plain = assemble(&RawDocument::new("docs_with_rules.txt", text));
    assert!(plain.commands.is_empty());
    assert_eq!(plain.sections.len(), 1);
}

#[test]
fn test_rules_file_unknown_directive() {
    let err = RuleParser::parse_file(get_fixture_path("bad_rules.txt")).unwrap_err();
    assert!(err.to_string().contains("line 3"));
    assert!(err.to_string().contains("stripp"));
}

#[test]
fn test_rule_loader_with_directory() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("rules.txt"), "profile: crawl\ntool: helm\n").unwrap();

    let loader = RuleLoaderBuilder::new().custom_dir(tmp.path()).build();
    let rules = loader.load_with_file(get_fixture_path("rules.txt")).unwrap();

    assert_eq!(rules.profile, Some(Profile::Crawl));
    assert_eq!(rules.tools, vec!["helm", "podman"]);
}

use b3od_api::types::{DownloadDescriptor, RawPage};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn deserialize_first_page() {
    let json = load_fixture("page_1.json");
    let page: RawPage = serde_json::from_str(&json).unwrap();
    assert_eq!(page.page_count, 3);
    assert_eq!(page.values.len(), 2);
    assert_eq!(page.values[0].len(), 5);
    assert_eq!(page.values[1][2], "DOLV21");
    assert_eq!(
        page.column_names(),
        vec!["RptDt", "Asst", "TckrSymb", "EcncIndDesc", "PricVal"]
    );
}

#[test]
fn deserialize_page_without_columns_or_values() {
    let json = load_fixture("page_empty.json");
    let page: RawPage = serde_json::from_str(&json).unwrap();
    assert_eq!(page.page_count, 0);
    assert!(page.values.is_empty());
    assert!(page.columns.is_empty());
}

#[test]
fn deserialize_page_requires_page_count() {
    let result = serde_json::from_str::<RawPage>(r#"{"values": []}"#);
    assert!(result.is_err());
}

#[test]
fn deserialize_descriptor() {
    let json = load_fixture("descriptor.json");
    let descriptor: DownloadDescriptor = serde_json::from_str(&json).unwrap();
    assert!(descriptor.redirect_url.starts_with('~'));
    assert_eq!(
        descriptor.resolve("https://arquivos.b3.com.br/api"),
        "https://arquivos.b3.com.br/api/download/?token=eyJhbGciOiJIUzI1NiJ9.ZmlsZQ.sig"
    );
}

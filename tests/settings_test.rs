use chrono::{TimeZone, Utc};
use notihist::parsing::{extract_snoozed, extract_status, read_xml_document, HistoryStatus};

/// Minimal Android Binary XML writer for fixtures.
struct AbxWriter {
    out: Vec<u8>,
    interned: Vec<String>,
}

const START_DOCUMENT: u8 = 0;
const END_DOCUMENT: u8 = 1;
const START_TAG: u8 = 2;
const END_TAG: u8 = 3;
const ATTRIBUTE: u8 = 15;

const TYPE_NULL: u8 = 1 << 4;
const TYPE_STRING: u8 = 2 << 4;
const TYPE_STRING_INTERNED: u8 = 3 << 4;
const TYPE_INT: u8 = 6 << 4;
const TYPE_LONG: u8 = 8 << 4;

impl AbxWriter {
    fn new() -> Self {
        let mut out = b"ABX\0".to_vec();
        out.push(TYPE_NULL | START_DOCUMENT);
        Self { out, interned: Vec::new() }
    }

    fn utf(&mut self, value: &str) {
        self.out.extend_from_slice(&(value.len() as u16).to_be_bytes());
        self.out.extend_from_slice(value.as_bytes());
    }

    fn interned(&mut self, value: &str) {
        if let Some(index) = self.interned.iter().position(|s| s == value) {
            self.out.extend_from_slice(&(index as u16).to_be_bytes());
        } else {
            self.out.extend_from_slice(&0xFFFFu16.to_be_bytes());
            self.utf(value);
            self.interned.push(value.to_string());
        }
    }

    fn start(&mut self, name: &str) -> &mut Self {
        self.out.push(TYPE_STRING_INTERNED | START_TAG);
        self.interned(name);
        self
    }

    fn end(&mut self, name: &str) -> &mut Self {
        self.out.push(TYPE_STRING_INTERNED | END_TAG);
        self.interned(name);
        self
    }

    fn string(&mut self, name: &str, value: &str) -> &mut Self {
        self.out.push(TYPE_STRING | ATTRIBUTE);
        self.interned(name);
        self.utf(value);
        self
    }

    fn int(&mut self, name: &str, value: i32) -> &mut Self {
        self.out.push(TYPE_INT | ATTRIBUTE);
        self.interned(name);
        self.out.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn long(&mut self, name: &str, value: i64) -> &mut Self {
        self.out.push(TYPE_LONG | ATTRIBUTE);
        self.interned(name);
        self.out.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn finish(&mut self) -> Vec<u8> {
        self.out.push(TYPE_NULL | END_DOCUMENT);
        std::mem::take(&mut self.out)
    }
}

const SETTINGS_XML: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>
<settings version="-1">
  <setting id="41" name="screensaver_enabled" value="1" package="android" defaultValue="1" defaultSysSet="true" />
  <setting id="87" name="notification_history_enabled" value="1" package="com.android.settings" />
</settings>
"#;

fn settings_abx() -> Vec<u8> {
    let mut abx = AbxWriter::new();
    abx.start("settings").int("version", -1);
    abx.start("setting")
        .long("id", 41)
        .string("name", "screensaver_enabled")
        .string("value", "1")
        .string("package", "android")
        .string("defaultValue", "1")
        .string("defaultSysSet", "true")
        .end("setting");
    abx.start("setting")
        .long("id", 87)
        .string("name", "notification_history_enabled")
        .string("value", "1")
        .string("package", "com.android.settings")
        .end("setting");
    abx.end("settings");
    abx.finish()
}

const POLICY_XML: &str = r#"<?xml version='1.0' encoding='utf-8' standalone='yes' ?>
<notification-policy version="1">
  <zen version="9" user="0">
    <allow calls="true" />
  </zen>
  <snoozed-notifications>
    <notification version="1" user-id="0" key="0|com.example.app|17|null|10123" time="1700000000000" />
    <notification version="1" user-id="0" key="0|com.other.app|3|null|10200" time="1700003600000" />
  </snoozed-notifications>
</notification-policy>
"#;

fn policy_abx() -> Vec<u8> {
    let mut abx = AbxWriter::new();
    abx.start("notification-policy").int("version", 1);
    abx.start("zen").int("version", 9).int("user", 0);
    abx.start("allow").string("calls", "true").end("allow");
    abx.end("zen");
    abx.start("snoozed-notifications");
    abx.start("notification")
        .int("version", 1)
        .int("user-id", 0)
        .string("key", "0|com.example.app|17|null|10123")
        .long("time", 1_700_000_000_000)
        .end("notification");
    abx.start("notification")
        .int("version", 1)
        .int("user-id", 0)
        .string("key", "0|com.other.app|3|null|10200")
        .long("time", 1_700_003_600_000)
        .end("notification");
    abx.end("snoozed-notifications");
    abx.end("notification-policy");
    abx.finish()
}

#[test]
fn test_status_from_text_xml() {
    let doc = read_xml_document(SETTINGS_XML.as_bytes()).unwrap();
    let rows = extract_status(&doc, "0", "settings_secure.xml");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, HistoryStatus::Enabled);
    assert_eq!(rows[0].user, "0");
}

#[test]
fn test_status_abx_matches_text() {
    let text = read_xml_document(SETTINGS_XML.as_bytes()).unwrap();
    let binary = read_xml_document(&settings_abx()).unwrap();

    assert_eq!(
        extract_status(&text, "10", "settings_secure.xml"),
        extract_status(&binary, "10", "settings_secure.xml")
    );
}

#[test]
fn test_snoozed_from_text_xml() {
    let doc = read_xml_document(POLICY_XML.as_bytes()).unwrap();
    let rows = extract_snoozed(&doc, "notification_policy.xml");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].key, "0|com.example.app|17|null|10123");
    assert_eq!(rows[0].reminder_time, Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap()));
    assert_eq!(rows[1].reminder_time, Some(Utc.with_ymd_and_hms(2023, 11, 14, 23, 13, 20).unwrap()));
}

#[test]
fn test_snoozed_abx_matches_text() {
    let text = read_xml_document(POLICY_XML.as_bytes()).unwrap();
    let binary = read_xml_document(&policy_abx()).unwrap();

    assert_eq!(
        extract_snoozed(&text, "notification_policy.xml"),
        extract_snoozed(&binary, "notification_policy.xml")
    );
}

#[test]
fn test_policy_without_snoozed_section() {
    let doc = read_xml_document(br#"<notification-policy version="1"><zen /></notification-policy>"#)
        .unwrap();
    assert!(extract_snoozed(&doc, "notification_policy.xml").is_empty());
}

#[test]
fn test_malformed_xml_is_an_error() {
    assert!(read_xml_document(b"<settings><setting></settings>").is_err());

    let mut truncated = settings_abx();
    truncated.truncate(truncated.len() / 2);
    assert!(read_xml_document(&truncated).is_err());
}

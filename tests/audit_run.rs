use anyhow::Result;
use std::fs;
use std::path::Path;
use tagaudit::tagset::tagset_file_name;
use tagaudit::{run, AuditConfig, AuditError, InventoryCache, PluginRecord, PluginSource};
use tempfile::TempDir;

struct FakeSource(Vec<PluginRecord>);

impl PluginSource for FakeSource {
    fn count(&self) -> Result<usize> {
        Ok(self.0.len())
    }
    fn name(&self, index: usize) -> Result<String> {
        Ok(self.0[index].name.clone())
    }
    fn manufacturer(&self, index: usize) -> Result<String> {
        Ok(self.0[index].manufacturer.clone())
    }
    fn identifier(&self, index: usize) -> Result<String> {
        Ok(self.0[index].identifier.clone())
    }
}

fn three_plugins() -> Vec<PluginRecord> {
    vec![
        PluginRecord::new("AUGraphicEQ", "Apple", "AudioUnit:Effects/aufx,greq,appl"),
        PluginRecord::new("EchoBoy", "Soundtoys", "AudioUnit:Effects/aufx,EcBy,SToy"),
        PluginRecord::new("Shimmer", "Valhalla DSP, LLC", "AudioUnit:Effects/aufx,shmr,oDin"),
    ]
}

fn setup() -> (TempDir, AuditConfig) {
    let root = TempDir::new().unwrap();
    let tags = root.path().join("Tags");
    fs::create_dir(&tags).unwrap();

    let mut config = AuditConfig::rooted_at(root.path());
    config.tag_database = tags;

    fs::write(&config.ignore_path, r#"["Apple-AUGraphicEQ"]"#).unwrap();
    write_tagset(&config.tag_database, "AudioUnit:Effects/aufx,EcBy,SToy", "Delay");

    (root, config)
}

fn write_tagset(dir: &Path, identifier: &str, category: &str) {
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n\
         <plist version=\"1.0\"><dict><key>tags</key><dict><key>{}</key><string>user</string></dict></dict></plist>",
        category
    );
    fs::write(dir.join(tagset_file_name(identifier).unwrap()), xml).unwrap();
}

#[test]
fn end_to_end_reports_the_one_missing_tagset() {
    let (_root, config) = setup();

    let report = run(&config, |_| Ok(FakeSource(three_plugins()))).unwrap();

    assert_eq!(report.plugins_scanned, 3);
    assert_eq!(report.ignored, 1);
    assert_eq!(report.warnings, 1);
    assert_eq!(report.summary(), "1 warnings, 3 plugins scanned");

    let log = fs::read_to_string(&config.log_path).unwrap();
    assert_eq!(
        log,
        "\nValhalla DSP, LLC - Shimmer (61756678-73686d72-6f44696e.tagset) : has no tagset"
    );
}

#[test]
fn second_run_uses_the_cache_and_writes_the_same_log() {
    let (_root, config) = setup();

    run(&config, |_| Ok(FakeSource(three_plugins()))).unwrap();
    let first = fs::read(&config.log_path).unwrap();

    let cached = InventoryCache::new(&config.cache_path).load().unwrap();
    assert_eq!(cached, Some(three_plugins()));

    let report = run(&config, |_| -> Result<FakeSource> { panic!("cache should be used") }).unwrap();
    let second = fs::read(&config.log_path).unwrap();

    assert_eq!(report.warnings, 1);
    assert_eq!(first, second);
}

#[test]
fn malformed_identifier_is_fatal() {
    let (_root, config) = setup();
    let mut plugins = three_plugins();
    plugins.push(PluginRecord::new("Mystery", "Unknown", "VST3:Mystery.vst3"));

    let err = run(&config, |_| Ok(FakeSource(plugins))).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AuditError>(),
        Some(AuditError::MalformedIdentifier { .. })
    ));
}

#[test]
fn corrupt_cache_is_fatal() {
    let (_root, config) = setup();
    fs::write(&config.cache_path, "{ truncated").unwrap();

    assert!(run(&config, |_| Ok(FakeSource(three_plugins()))).is_err());
}

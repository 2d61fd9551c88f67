use orgchart_core::{PartitionOverrides, RootOverrides, RowSet};
use orgchart_render::{LayoutOptions, layout_with_overrides, render_chart, render_drawio};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
}

fn read_fixture(name: &str) -> String {
    let path = fixtures_root().join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
        .replace("\r\n", "\n")
}

fn load_overrides(stem: &str) -> PartitionOverrides {
    let path = fixtures_root().join(format!("{stem}.overrides.json"));
    if !path.exists() {
        return PartitionOverrides::new();
    }
    PartitionOverrides::from_json_str(&read_fixture(&format!("{stem}.overrides.json"))).unwrap()
}

fn render_fixture_partition(stem: &str, partition: &str) -> String {
    let rows = RowSet::from_csv_str(&read_fixture(&format!("{stem}.csv"))).unwrap();
    let overrides = load_overrides(stem);
    let empty = RootOverrides::new();
    let chart = layout_with_overrides(
        rows.partition(partition).unwrap(),
        overrides.for_partition(partition).unwrap_or(&empty),
        &LayoutOptions::default(),
    )
    .unwrap();
    render_chart(&chart, &LayoutOptions::default())
}

#[test]
fn fixtures_match_golden_documents() {
    for (stem, partition) in [
        ("chain", "HQ"),
        ("riyadh_dammam", "Riyadh"),
        ("riyadh_dammam", "Dammam"),
    ] {
        let actual = render_fixture_partition(stem, partition);
        let expected = read_fixture(&format!("{stem}.{partition}.golden.drawio"));
        assert_eq!(actual, expected, "golden mismatch for {stem}/{partition}");
    }
}

#[test]
fn repeated_runs_are_byte_identical() {
    let a = render_fixture_partition("riyadh_dammam", "Dammam");
    let b = render_fixture_partition("riyadh_dammam", "Dammam");
    assert_eq!(a, b);
}

#[test]
fn emitted_document_is_consistent_xml() {
    let rows = RowSet::from_csv_str(&read_fixture("riyadh_dammam.csv")).unwrap();
    let overrides = load_overrides("riyadh_dammam");
    let empty = RootOverrides::new();
    let options = LayoutOptions::default();
    let charts: Vec<_> = rows
        .partitions()
        .into_iter()
        .map(|p| {
            let o = overrides.for_partition(p.name()).unwrap_or(&empty).clone();
            layout_with_overrides(p, &o, &options).unwrap()
        })
        .collect();
    let text = render_drawio(&charts, &options);

    let doc = roxmltree::Document::parse(&text).expect("well-formed XML");
    let mxfile = doc.root_element();
    assert_eq!(mxfile.tag_name().name(), "mxfile");
    assert_eq!(mxfile.attribute("host"), Some("app.diagrams.net"));

    let diagrams: Vec<_> = mxfile.children().filter(|n| n.is_element()).collect();
    assert_eq!(diagrams.len(), 2);
    assert_eq!(diagrams[0].attribute("name"), Some("OrgChart_Riyadh"));
    assert_eq!(diagrams[1].attribute("name"), Some("OrgChart_Dammam"));

    for diagram in diagrams {
        let root = diagram
            .descendants()
            .find(|n| n.has_tag_name("root"))
            .expect("root element");
        let cells: Vec<_> = root.children().filter(|n| n.has_tag_name("mxCell")).collect();
        assert_eq!(cells[0].attribute("id"), Some("0"));
        assert_eq!(cells[1].attribute("id"), Some("1"));
        assert_eq!(cells[1].attribute("parent"), Some("0"));

        let mut ids = HashSet::new();
        let mut vertices = HashSet::new();
        for cell in &cells {
            let id = cell.attribute("id").expect("cell id");
            assert!(ids.insert(id), "duplicate id {id}");
            if cell.attribute("vertex") == Some("1") {
                assert!(id != "0" && id != "1");
                vertices.insert(id);
                let geometry = cell
                    .children()
                    .find(|n| n.has_tag_name("mxGeometry"))
                    .expect("geometry");
                assert_eq!(geometry.attribute("width"), Some("160"));
                assert_eq!(geometry.attribute("height"), Some("60"));
            }
        }

        for cell in cells.iter().filter(|c| c.attribute("edge") == Some("1")) {
            let source = cell.attribute("source").expect("source");
            let target = cell.attribute("target").expect("target");
            assert!(vertices.contains(source), "edge source {source} not a vertex");
            assert!(vertices.contains(target), "edge target {target} not a vertex");
            assert!(cell.attribute("value").is_none());
        }
    }
}

#[test]
fn custom_options_flow_into_the_document() {
    let options = LayoutOptions::from_yaml_str(
        "column_spacing: 240\nrow_spacing: 90.5\nhost: example.org\ndiagram_name_prefix: Chart-\n",
    )
    .unwrap();
    let rows = RowSet::from_csv_str(&read_fixture("chain.csv")).unwrap();
    let chart =
        layout_with_overrides(rows.partition("HQ").unwrap(), &RootOverrides::new(), &options)
            .unwrap();
    let text = render_chart(&chart, &options);
    assert!(text.contains(r#"<mxfile host="example.org">"#));
    assert!(text.contains(r#"<diagram name="Chart-HQ">"#));
    assert!(text.contains(r#"<mxGeometry x="0" y="181" width="160" height="60" as="geometry"/>"#));
    assert!(text.contains(r#"<mxGeometry x="0" y="90.5" width="160" height="60" as="geometry"/>"#));
}

//! End-to-end merging of ribbon documents contributed by several plugins.

use ribbon_config::{
    BuildOptions, BuildOutput, Element, GroupSize, IdentityResolver, Origin, RibbonBuilder,
    RibbonModel, fragments_from_document, resolve, write_xml,
};

/// Merge `(plugin, document)` pairs in order.
fn build(documents: &[(&str, &str)]) -> BuildOutput {
    let mut builder = RibbonBuilder::new(BuildOptions::default());
    for (plugin, content) in documents {
        let document = ribbon_xml::parse(content).expect("Failed to parse fixture");
        let mut diagnostics = Vec::new();
        let fragments =
            fragments_from_document(&document.root, &Origin::new(*plugin), &mut diagnostics);
        builder.add_fragments(fragments).add_diagnostics(diagnostics);
    }
    builder.build().expect("Build failed")
}

fn codes(output: &BuildOutput) -> Vec<String> {
    output
        .diagnostics
        .iter()
        .filter_map(|d| d.code.clone())
        .collect()
}

/// Control ids of a size variant, in display order, layouts flattened.
fn ids(size: Option<&GroupSize>) -> Vec<String> {
    fn walk(element: &Element, out: &mut Vec<String>) {
        match element {
            Element::Control(control) => out.push(control.id.clone()),
            Element::Separator => {}
            Element::Layout(layout) => layout.children.iter().for_each(|c| walk(c, out)),
            Element::Toolbar(toolbar) => out.extend(toolbar.children.iter().map(|c| c.id.clone())),
        }
    }
    let mut out = Vec::new();
    if let Some(size) = size {
        size.iter().for_each(|e| walk(e, &mut out));
    }
    out
}

fn medium_of(model: &RibbonModel, tab: &str, group: &str) -> Vec<String> {
    let tab = model.find_tab(tab).expect("tab not found");
    let group = tab
        .groups()
        .iter()
        .find(|g| g.label.is_named(group))
        .expect("group not found");
    ids(group.medium.as_ref())
}

const BASE: &str = r#"<tab label="T"><groups>
  <group label="G"><medium><control id="A"/><control id="B"/><control id="C"/></medium></group>
</groups></tab>"#;

fn inject(id: &str, order: &str) -> String {
    format!(
        r#"<tab label="T" override="true"><groups>
  <group label="G" override="true" controlsOrder="{order}"><medium><control id="{id}"/></medium></group>
</groups></tab>"#
    )
}

#[test]
fn test_positional_injection() {
    let cases = [
        ("2", vec!["A", "D", "B", "C"], false),
        ("-1", vec!["A", "B", "D", "C"], false),
        ("0", vec!["A", "B", "C", "D"], false),
        ("5", vec!["A", "B", "C", "D"], true),
        ("-5", vec!["D", "A", "B", "C"], true),
    ];
    for (order, expected, out_of_bound) in cases {
        let plugin = inject("D", order);
        let output = build(&[("core", BASE), ("plugin", &plugin)]);
        assert_eq!(medium_of(&output.model, "T", "G"), expected, "order {order}");
        let expected_codes: Vec<String> = if out_of_bound {
            vec!["R-1-2".to_string()]
        } else {
            Vec::new()
        };
        assert_eq!(codes(&output), expected_codes, "order {order}");
    }
}

#[test]
fn test_secondary_orders_break_ties() {
    let x = inject("X", "2.5");
    let y = inject("Y", "2.1");
    let output = build(&[("core", BASE), ("x", &x), ("y", &y)]);
    assert_eq!(medium_of(&output.model, "T", "G"), vec!["A", "Y", "X", "B", "C"]);
}

#[test]
fn test_injections_conserve_elements() {
    let contributions = [inject("D", "1"), inject("E", "-1"), inject("F", "9"), inject("G", "2.3")];
    let mut documents = vec![("core", BASE)];
    documents.extend(contributions.iter().map(|c| ("plugin", c.as_str())));
    let output = build(&documents);

    let medium = medium_of(&output.model, "T", "G");
    assert_eq!(medium.len(), 7);
    for id in ["A", "B", "C", "D", "E", "F", "G"] {
        assert_eq!(medium.iter().filter(|m| *m == id).count(), 1, "{id}");
    }
}

#[test]
fn test_override_twice_keeps_control_set() {
    let once = build(&[("core", BASE), ("p", &inject("A", "2"))]);
    let twice = build(&[("core", BASE), ("p", &inject("A", "2")), ("p", &inject("A", "2"))]);

    let tab = |output: &BuildOutput| {
        output.model.find_tab("T").and_then(|t| t.groups().first().cloned())
    };
    let once = tab(&once).and_then(|g| g.medium).expect("medium");
    let twice = tab(&twice).and_then(|g| g.medium).expect("medium");

    assert_eq!(once.control_ids(), twice.control_ids());
    // duplicates are kept
    assert_eq!(once.len(), 4);
    assert_eq!(twice.len(), 5);
}

#[test]
fn test_excluded_control_never_appears() {
    let core = r#"<ribbon>
  <app-menu><control id="save"/><control id="print"/></app-menu>
  <tabs>
    <tab label="HOME"><groups>
      <group label="G">
        <medium>
          <control id="save"/>
          <layout cols="1"><control id="print"/><toolbar><control id="print"/><control id="zoom"/></toolbar></layout>
        </medium>
      </group>
    </groups></tab>
  </tabs>
</ribbon>"#;
    let policy = r#"<ribbon><exclude><exclude-control id="print"/></exclude></ribbon>"#;
    let output = build(&[("core", core), ("policy", policy)]);

    assert!(!output.model.control_ids().contains("print"));
    assert_eq!(medium_of(&output.model, "HOME", "G"), vec!["save", "zoom"]);
    assert!(codes(&output).is_empty());
}

#[test]
fn test_excluded_plugin_contributes_nothing() {
    let plugin = inject("D", "1");
    let policy = r#"<exclude-import plugin="extra"/>"#;
    let output = build(&[("core", BASE), ("extra", &plugin), ("policy", policy)]);
    assert_eq!(medium_of(&output.model, "T", "G"), vec!["A", "B", "C"]);
}

#[test]
fn test_override_variant_fallback_chain() {
    let target = r#"<tab label="T"><groups>
  <group label="G">
    <large><control id="a" colspan="2"/></large>
    <medium><control id="a"/></medium>
    <small><control id="a"/></small>
  </group>
</groups></tab>"#;
    let large_and_small = r#"<tab label="T" override="true"><groups>
  <group label="G" override="true"><large><control id="L"/></large><small><control id="S"/></small></group>
</groups></tab>"#;
    let small_only = r#"<tab label="T" override="true"><groups>
  <group label="G" override="true"><small><control id="s"/></small></group>
</groups></tab>"#;

    let output = build(&[("core", target), ("p1", large_and_small), ("p2", small_only)]);
    let tab = output.model.find_tab("T").expect("tab");
    let group = tab.groups().first().expect("group");

    // a missing variant is looked up as medium, then large, then small,
    // whatever the target variant is
    assert_eq!(ids(group.large.as_ref()), vec!["a", "L", "s"]);
    assert_eq!(ids(group.medium.as_ref()), vec!["a", "L", "s"]);
    assert_eq!(ids(group.small.as_ref()), vec!["a", "S", "s"]);
    // small now differs from medium after each override
    assert_eq!(codes(&output), vec!["R-2-1", "R-2-1"]);
}

#[test]
fn test_override_breaking_size_consistency_is_reported() {
    let target = r#"<tab label="T"><groups>
  <group label="G"><medium><control id="a"/></medium><small><control id="a"/></small></group>
</groups></tab>"#;
    let plugin = r#"<tab label="T" override="true"><groups>
  <group label="G" override="true"><large><control id="L"/></large><small><control id="S"/></small></group>
</groups></tab>"#;

    let output = build(&[("core", target), ("plugin", plugin)]);
    assert_eq!(codes(&output), vec!["R-2-1"]);
    assert!(output.has_errors());

    let tab = output.model.find_tab("T").expect("tab");
    let group = tab.groups().first().expect("group");
    assert!(group.check_size_consistency().is_err());
    assert_eq!(ids(group.medium.as_ref()), vec!["a", "L"]);
    assert_eq!(ids(group.small.as_ref()), vec!["a", "S"]);
}

#[test]
fn test_inconsistent_group_rejects_its_fragment() {
    let broken = r#"<tab label="BROKEN"><groups>
  <group label="G"><medium><control id="a"/></medium><small><control id="b"/></small></group>
</groups></tab>"#;
    let output = build(&[("core", BASE), ("broken", broken)]);
    assert!(output.model.find_tab("BROKEN").is_none());
    assert!(output.model.find_tab("T").is_some());
    assert_eq!(codes(&output), vec!["R-2-1"]);
    assert!(output.has_errors());
}

#[test]
fn test_merged_ribbon_document() {
    let core = r#"<ribbon>
  <app-menu><control id="save"/><control id="quit"/></app-menu>
  <tabs>
    <tab label="HOME">
      <groups>
        <group label="CLIPBOARD" icon="paste.png">
          <control id="paste" colspan="2"/>
          <control id="cut"/>
          <control id="copy"/>
        </group>
      </groups>
    </tab>
    <tab label="VIEW">
      <groups>
        <group label="ZOOM"><control id="zoom"/></group>
      </groups>
    </tab>
  </tabs>
</ribbon>"#;
    let cms = r#"<ribbon>
  <app-menu order="-1"><separator/><control id="publish"/></app-menu>
  <tabs>
    <tab label="CONTENT" order="HOME" controlId="content-tab" contextualColor="2" contextualLabel="CONTENT_CTX">
      <groups><group label="EDIT"><control id="edit"/></group></groups>
    </tab>
  </tabs>
</ribbon>"#;

    let output = build(&[("core", core), ("cms", cms)]);
    assert!(output.diagnostics.is_empty());

    let resolved = resolve(&output.model, &IdentityResolver);
    insta::assert_snapshot!(write_xml(&resolved).unwrap(), @r#"
    <ribbon xmlns:i18n="http://apache.org/cocoon/i18n/2.1">
      <app-menu>
        <control id="save" colspan="1"/>
        <separator/>
        <control id="publish" colspan="1"/>
        <control id="quit" colspan="1"/>
      </app-menu>
      <user-menu/>
      <tabs>
        <tab label="application:HOME" i18n:attr="label">
          <groups>
            <group icon="paste.png" priority="0" label="application:CLIPBOARD" i18n:attr="label">
              <large colspan="4">
                <control id="paste" colspan="2"/>
                <control id="cut" colspan="1"/>
                <control id="copy" colspan="1"/>
              </large>
              <medium colspan="1">
                <layout align="top" size="small" cols="1">
                  <control id="paste" colspan="2"/>
                  <control id="cut" colspan="1"/>
                  <control id="copy" colspan="1"/>
                </layout>
              </medium>
              <small colspan="0"/>
            </group>
          </groups>
        </tab>
        <tab label="application:CONTENT" id="content-tab" contextualColor="2" contextualLabel="application:CONTENT_CTX" i18n:attr="label contextualLabel">
          <groups>
            <group priority="0" label="application:EDIT" i18n:attr="label">
              <large colspan="0"/>
              <medium colspan="1">
                <control id="edit" colspan="1"/>
              </medium>
              <small colspan="0"/>
            </group>
          </groups>
        </tab>
        <tab label="application:VIEW" i18n:attr="label">
          <groups>
            <group priority="0" label="application:ZOOM" i18n:attr="label">
              <large colspan="0"/>
              <medium colspan="1">
                <control id="zoom" colspan="1"/>
              </medium>
              <small colspan="0"/>
            </group>
          </groups>
        </tab>
      </tabs>
    </ribbon>
    "#);
}

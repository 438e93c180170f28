use std::io::Write;
use std::path::{Path, PathBuf};

use yang_model_core::{
    BuildOptions, DataNodeContainer, NodeKind, SchemaError, SchemaNode, Status, TypeRef,
};
use yang_model_loader::{CompilerConfig, LoaderError, ModuleDocument, SchemaLoader};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const INET_TYPES: &str = r#"
module: inet-types
namespace: "urn:ietf:params:xml:ns:yang:ietf-inet-types"
prefix: inet
revision: "2013-07-15"
body:
  - statement: typedef
    name: port-number
    type: uint16
    description: A 16-bit port number
  - statement: grouping
    name: endpoint
    body:
      - { statement: leaf, name: address, type: string, mandatory: true }
      - { statement: leaf, name: port, type: port-number }
"#;

const INTERFACES_JSON: &str = r#"{
  "module": "interfaces",
  "namespace": "urn:example:interfaces",
  "prefix": "if",
  "revision": "2013-07-01",
  "imports": [{ "module": "inet-types", "prefix": "inet" }],
  "body": [
    {
      "statement": "list",
      "name": "interface",
      "key": ["name"],
      "body": [
        { "statement": "leaf", "name": "name", "type": "string" },
        { "statement": "leaf", "name": "mtu", "type": "uint32", "units": "octets" },
        {
          "statement": "container",
          "name": "peer",
          "body": [
            {
              "statement": "uses",
              "grouping": "inet:endpoint",
              "augments": [
                {
                  "target": "",
                  "description": "Local override",
                  "body": [{ "statement": "leaf", "name": "vrf", "type": "string" }]
                }
              ]
            }
          ]
        }
      ]
    },
    {
      "statement": "rpc",
      "name": "reset",
      "status": "deprecated",
      "body": [
        {
          "statement": "input",
          "body": [{ "statement": "leaf", "name": "delay", "type": "uint32" }]
        },
        { "statement": "output" }
      ]
    }
  ]
}"#;

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f.flush().unwrap();
    path
}

fn sample_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "inet-types.yaml", INET_TYPES);
    write_file(dir.path(), "interfaces.json", INTERFACES_JSON);
    dir
}

// ---------------------------------------------------------------------------
// Directory loading and compilation
// ---------------------------------------------------------------------------

#[test]
fn test_compile_mixed_formats() {
    let dir = sample_dir();
    let loader = SchemaLoader::from_dir(dir.path()).unwrap();
    assert_eq!(loader.len(), 2);

    let context = loader.compile(&BuildOptions::default()).unwrap();
    let interfaces = context.module("interfaces").unwrap();
    assert_eq!(interfaces.revision().unwrap().to_string(), "2013-07-01");

    let list = interfaces
        .data_child_by_name("interface")
        .and_then(|node| node.as_list())
        .unwrap();
    assert_eq!(list.keys(), &[interfaces.qname("name")]);
    assert_eq!(list.path().to_string(), "/interface");

    let mtu = list.data_child_by_name("mtu").and_then(|n| n.as_leaf()).unwrap();
    assert_eq!(mtu.units(), Some("octets"));

    let peer = list
        .data_child_by_name("peer")
        .and_then(|node| node.as_container())
        .unwrap();
    let uses = &peer.uses()[0];
    assert_eq!(uses.grouping_qname().local_name(), "endpoint");
    assert_eq!(uses.augmentations()[0].description(), Some("Local override"));

    let port = uses.data_child_by_name("port").and_then(|n| n.as_leaf()).unwrap();
    let TypeRef::Derived(port_type) = port.type_ref() else {
        panic!("expected a derived type");
    };
    assert_eq!(port_type.namespace(), "urn:ietf:params:xml:ns:yang:ietf-inet-types");
    assert!(uses.data_child_by_name("vrf").is_some());
    assert!(uses.data_child_by_name("address").unwrap().as_leaf().unwrap().is_mandatory());
}

#[test]
fn test_compile_rpc() {
    let dir = sample_dir();
    let context = SchemaLoader::from_dir(dir.path())
        .unwrap()
        .compile(&BuildOptions::default())
        .unwrap();
    let interfaces = context.module("interfaces").unwrap();

    let reset = interfaces.rpc(&interfaces.qname("reset")).unwrap();
    assert_eq!(reset.status(), Status::Deprecated);
    assert!(reset.input().data_child_by_name("delay").is_some());
    assert!(reset.output().child_nodes().is_empty());
    assert_eq!(
        context.find_rpc(&interfaces.qname("reset")).map(|rpc| rpc.qname()),
        Some(&interfaces.qname("reset"))
    );
}

#[test]
fn test_compile_is_repeatable() {
    let dir = sample_dir();
    let loader = SchemaLoader::from_dir(dir.path()).unwrap();
    let first = loader.compile(&BuildOptions::default()).unwrap();
    let second = loader.compile(&BuildOptions::default()).unwrap();
    assert_eq!(
        first.module("interfaces").unwrap().as_ref(),
        second.module("interfaces").unwrap().as_ref()
    );
}

#[test]
fn test_key_and_augment_on_imported_grouping() {
    let base = r#"
module: base
namespace: "urn:base"
prefix: b
body:
  - statement: grouping
    name: endpoint
    body:
      - { statement: leaf, name: address, type: string }
      - statement: container
        name: opts
        body:
          - { statement: uses, grouping: timers }
  - statement: grouping
    name: timers
    body:
      - { statement: container, name: keepalive }
"#;
    let app = r#"
module: app
namespace: "urn:app"
prefix: app
imports: [{ module: base, prefix: b }]
body:
  - statement: list
    name: peers
    key: [address]
    body:
      - statement: uses
        grouping: "b:endpoint"
        augments:
          - target: opts
            body:
              - { statement: leaf, name: vrf, type: string }
          - target: opts/keepalive
            body:
              - { statement: leaf, name: interval, type: uint32 }
"#;
    let loader = SchemaLoader::from_documents([
        ModuleDocument::from_yaml_str(base).unwrap(),
        ModuleDocument::from_yaml_str(app).unwrap(),
    ])
    .unwrap();
    let context = loader.compile(&BuildOptions::default()).unwrap();
    let app = context.module("app").unwrap();
    let base = context.module("base").unwrap();

    let peers = app.data_child_by_name("peers").and_then(|n| n.as_list()).unwrap();
    assert_eq!(peers.keys(), &[base.qname("address")]);

    let uses = &peers.uses()[0];
    let opts = uses
        .data_child_by_qname(&base.qname("opts"))
        .and_then(|n| n.as_container())
        .unwrap();
    assert!(opts.data_child_by_qname(&app.qname("vrf")).is_some());

    let keepalive = opts.uses()[0]
        .data_child_by_name("keepalive")
        .and_then(|n| n.as_container())
        .unwrap();
    assert!(keepalive.data_child_by_qname(&app.qname("interval")).is_some());
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn test_missing_output_fails_compile() {
    let yaml = r#"
module: ops
namespace: "urn:ops"
prefix: ops
body:
  - statement: rpc
    name: ping
    body:
      - statement: input
"#;
    let loader =
        SchemaLoader::from_documents([ModuleDocument::from_yaml_str(yaml).unwrap()]).unwrap();
    let err = loader.compile(&BuildOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        LoaderError::Schema(SchemaError::MissingOutput(ref q)) if q.local_name() == "ping"
    ));
}

#[test]
fn test_uses_under_rpc_rejected_while_assembling() {
    let yaml = r#"
module: ops
namespace: "urn:ops"
prefix: ops
body:
  - statement: grouping
    name: g
  - statement: rpc
    name: ping
    body:
      - { statement: uses, grouping: g }
"#;
    let loader =
        SchemaLoader::from_documents([ModuleDocument::from_yaml_str(yaml).unwrap()]).unwrap();
    let err = loader.assemble().unwrap_err();
    assert!(matches!(
        err,
        LoaderError::Module {
            source: SchemaError::UnsupportedStructure { kind: NodeKind::Rpc, statement: "uses", .. },
            ..
        }
    ));
    assert!(err.to_string().starts_with("module ops: cannot add uses to rpc"));
}

#[test]
fn test_cycle_across_modules() {
    let a = r#"
module: a
namespace: "urn:a"
prefix: a
imports: [{ module: b, prefix: b }]
body:
  - statement: grouping
    name: ga
    body:
      - { statement: uses, grouping: "b:gb" }
"#;
    let b = r#"
module: b
namespace: "urn:b"
prefix: b
imports: [{ module: a, prefix: a }]
body:
  - statement: grouping
    name: gb
    body:
      - { statement: uses, grouping: "a:ga" }
"#;
    let loader = SchemaLoader::from_documents([
        ModuleDocument::from_yaml_str(a).unwrap(),
        ModuleDocument::from_yaml_str(b).unwrap(),
    ])
    .unwrap();
    let err = loader.compile(&BuildOptions::default()).unwrap_err();
    assert!(matches!(err, LoaderError::Schema(SchemaError::GroupingCycle(_))));
}

#[test]
fn test_config_depth_limit_applies() {
    let root = tempfile::tempdir().unwrap();
    let schemas = root.path().join("schemas");
    std::fs::create_dir_all(&schemas).unwrap();
    write_file(&schemas, "inet-types.yaml", INET_TYPES);
    write_file(&schemas, "interfaces.json", INTERFACES_JSON);
    let config_path = write_file(
        root.path(),
        "yang-compile.yml",
        "version: \"1.0\"\nsources: [schemas]\nbuild:\n  max_depth: 1\n",
    );
    let config = CompilerConfig::load(&config_path).unwrap();

    let loader = SchemaLoader::builder()
        .with_config(&config, root.path())
        .build()
        .unwrap();
    assert_eq!(loader.len(), 2);
    let err = loader.compile(&config.build).unwrap_err();
    assert!(matches!(err, LoaderError::Schema(SchemaError::DepthExceeded(1))));
}

#[test]
fn test_excluded_import_is_reported() {
    let dir = sample_dir();
    let loader = SchemaLoader::builder()
        .source(dir.path())
        .exclude("inet-types")
        .build()
        .unwrap();
    let err = loader.compile(&BuildOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        LoaderError::UnknownImport { ref import, .. } if import == "inet-types"
    ));
}

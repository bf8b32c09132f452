use std::fs;
use std::future::Ready;

use chrono::{TimeZone, Utc};
use otg_core::config::{GenerateOptions, PropertyNaming, SplitStrategy};
use otg_core::error::FetchError;
use otg_core::generate_types;
use otg_core::load::{DocumentFormat, SpecInput, parse_document};
use otg_typescript::TypeScriptGenerator;
use serde_json::{Value, json};

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");

fn petstore() -> SpecInput {
    SpecInput::Document(parse_document(PETSTORE, DocumentFormat::Yaml).unwrap())
}

fn no_network(url: String) -> Ready<Result<Value, FetchError>> {
    panic!("unexpected fetch of {url}")
}

fn generator() -> TypeScriptGenerator {
    TypeScriptGenerator::with_timestamp(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap())
}

fn without_header() -> GenerateOptions {
    GenerateOptions {
        include_header: false,
        ..Default::default()
    }
}

#[tokio::test]
async fn minimal_schema_becomes_interface() {
    let input = SpecInput::Document(json!({
        "openapi": "3.0.0",
        "paths": {},
        "components": {
            "schemas": {
                "Hello": {
                    "type": "object",
                    "properties": { "message": { "type": "string" } }
                }
            }
        }
    }));
    let out = generate_types(&input, &without_header(), &no_network, &generator())
        .await
        .unwrap();
    assert_eq!(
        out,
        "/** Hello */\nexport interface Hello {\n    message?: string;\n}\n"
    );
}

#[tokio::test]
async fn single_file_contains_every_type() {
    let out = generate_types(&petstore(), &without_header(), &no_network, &generator())
        .await
        .unwrap();

    assert!(out.contains(
        "/**\n * A pet in the store.\n *\n * Used by:\n *  - GET /pets\n *  - POST /pets\n *  - GET /users/{id}/pets\n */\nexport interface Pet {"
    ));
    assert!(out.contains("    /** Format: int64 */\n    id: number;\n"));
    assert!(out.contains("    owner?: User;\n"));
    assert!(out.contains("export interface NewPet extends Pet {\n    tag?: string;\n}"));
    assert!(out.contains("    items?: Pet[];\n"));
    assert!(out.contains("    next?: string | null;\n"));
    assert!(out.contains("    address?: {\n        street?: string;\n        city?: string;\n    };\n"));
    assert!(out.contains("/** Not used by any operation. */\nexport interface Adoption {"));

    let declared: Vec<&str> = out
        .lines()
        .filter_map(|line| line.strip_prefix("export "))
        .collect();
    assert_eq!(declared.len(), 7);
}

#[tokio::test]
async fn header_and_camel_case_properties() {
    let options = GenerateOptions {
        property_naming: PropertyNaming::Camel,
        source_label: Some("petstore.yaml".to_string()),
        include_endpoint_hints: false,
        ..Default::default()
    };
    let out = generate_types(&petstore(), &options, &no_network, &generator())
        .await
        .unwrap();
    assert!(out.starts_with(
        "/**\n * Auto-generated TypeScript types by otg\n * Generated at: 2026-03-01T12:00:00.000Z\n * Source file: petstore.yaml\n * DO NOT EDIT THIS FILE MANUALLY\n */\n\n"
    ));
    assert!(out.contains("    emailAddress?: string;\n"));
    assert!(!out.contains("Used by:"));
}

#[tokio::test]
async fn split_by_tag_writes_modules_and_index() {
    let dir = tempfile::tempdir().unwrap();
    let options = GenerateOptions {
        output: Some(dir.path().to_path_buf()),
        split: Some(SplitStrategy::Tag),
        include_header: false,
        include_endpoint_hints: false,
        ..Default::default()
    };
    let index = generate_types(&petstore(), &options, &no_network, &generator())
        .await
        .unwrap();

    assert_eq!(
        index,
        "export type { User, Pet, NewPet, Adoption, Error } from \"./common.ts\";\n\
         export type { PetPage } from \"./pets.ts\";\n\
         export type { UserProfile } from \"./users.ts\";\n"
    );
    assert_eq!(fs::read_to_string(dir.path().join("index.ts")).unwrap(), index);

    let common = fs::read_to_string(dir.path().join("common.ts")).unwrap();
    assert!(!common.contains("import type"));
    let user = common.find("export interface User ").unwrap();
    let pet = common.find("export interface Pet ").unwrap();
    let new_pet = common.find("export interface NewPet ").unwrap();
    assert!(user < pet && pet < new_pet);

    let pets = fs::read_to_string(dir.path().join("pets.ts")).unwrap();
    assert!(pets.starts_with("import type { Pet } from \"./common.ts\";\n\n/** PetPage */\nexport interface PetPage {"));

    let users = fs::read_to_string(dir.path().join("users.ts")).unwrap();
    assert!(users.starts_with("import type { User } from \"./common.ts\";\n\n"));
    assert!(users.contains("export interface UserProfile {"));
}

#[tokio::test]
async fn split_files_share_one_header() {
    let dir = tempfile::tempdir().unwrap();
    let options = GenerateOptions {
        output: Some(dir.path().join("types")),
        split: Some(SplitStrategy::Path),
        header_comment: Some("// @generated".to_string()),
        ..Default::default()
    };
    generate_types(&petstore(), &options, &no_network, &generator())
        .await
        .unwrap();

    let mut names: Vec<String> = fs::read_dir(dir.path().join("types"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["common.ts", "index.ts", "pets.ts", "users.ts"]);
    for name in names {
        let content = fs::read_to_string(dir.path().join("types").join(&name)).unwrap();
        assert!(content.starts_with("// @generated\n\n"), "{name}");
    }
}

#[tokio::test]
async fn index_tag_does_not_clobber_index_file() {
    let input = SpecInput::Document(json!({
        "openapi": "3.0.0",
        "paths": {
            "/search": {
                "get": {
                    "tags": ["Index"],
                    "responses": {
                        "200": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Hit" }
                                }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Hit": {
                    "type": "object",
                    "properties": { "score": { "type": "number" } }
                }
            }
        }
    }));
    let dir = tempfile::tempdir().unwrap();
    let options = GenerateOptions {
        output: Some(dir.path().to_path_buf()),
        split: Some(SplitStrategy::Tag),
        include_header: false,
        include_endpoint_hints: false,
        ..Default::default()
    };
    let index = generate_types(&input, &options, &no_network, &generator())
        .await
        .unwrap();

    assert_eq!(index, "export type { Hit } from \"./index-types.ts\";\n");
    assert_eq!(fs::read_to_string(dir.path().join("index.ts")).unwrap(), index);
    let module = fs::read_to_string(dir.path().join("index-types.ts")).unwrap();
    assert!(module.contains("export interface Hit {\n    score?: number;\n}"));
}

#[tokio::test]
async fn openapi31_boolean_subschemas_generate() {
    let input = SpecInput::Document(json!({
        "openapi": "3.1.0",
        "paths": {},
        "components": {
            "schemas": {
                "Hello": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" },
                        "anything": true,
                        "nothing": false
                    }
                }
            }
        }
    }));
    let out = generate_types(&input, &without_header(), &no_network, &generator())
        .await
        .unwrap();
    assert_eq!(
        out,
        "/** Hello */\nexport interface Hello {\n    message?: string;\n    anything?: unknown;\n    nothing?: never;\n}\n"
    );
}

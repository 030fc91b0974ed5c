use macronade_core::{
    export_project_json, parse_project_json, reduce, Action, AppState, AssetCategory, Engine,
    EntityId, ProjectError, RigManifest,
};

fn sample_state() -> AppState {
    let mut state = reduce(
        &AppState::new(),
        &Action::ImportAsset {
            category: AssetCategory::Pantin,
            path: "/pantins/macron.svg".into(),
            label: "Macron".into(),
            size: None,
        },
    );
    state = reduce(
        &state,
        &Action::SetMemberRotation {
            item_id: EntityId(1),
            member_id: "bras_droit".into(),
            degrees: 45.0,
        },
    );
    state = reduce(&state, &Action::AddKeyframe);
    state = reduce(&state, &Action::SetCurrentFrame { frame: 24 });
    state = reduce(&state, &Action::AddKeyframe);
    state
}

/// it should round-trip everything except the transient fields
#[test]
fn export_then_load_round_trips() {
    let mut state = sample_state();
    state = reduce(&state, &Action::TogglePlay);
    state = reduce(
        &state,
        &Action::RequestDetach {
            item_id: EntityId(1),
        },
    );
    let json = export_project_json(&state).unwrap();

    let mut engine = Engine::new();
    engine.load_project(&json).unwrap();
    let loaded = engine.state();

    assert!(!loaded.timeline.is_playing);
    assert!(loaded.attachment_request.is_none());
    let mut expected = state.clone();
    expected.timeline.is_playing = false;
    expected.attachment_request = None;
    assert_eq!(loaded.timeline, expected.timeline);
    assert_eq!(loaded.layers, expected.layers);
    assert_eq!(loaded.scene, expected.scene);
}

/// it should write the documented camelCase shape
#[test]
fn export_uses_camel_case_keys() {
    let json = export_project_json(&sample_state()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["version"], 1);
    assert!(value.pointer("/timeline/keyframeStates/0").is_some());
    assert!(value.pointer("/timeline/loopEnabled").is_some());
    assert!(value.pointer("/scene/items/0/memberRotations").is_some());
    assert!(value.pointer("/scene/items/0/assetPath").is_some());
    // Transients never serialize.
    assert!(value.pointer("/timeline/isPlaying").is_none());
    assert!(value.pointer("/selection").is_none());
}

/// it should reject a file missing timeline.keyframes and leave state untouched
#[test]
fn missing_keyframes_rejected() {
    let json = r#"{"timeline": {}, "layers": {"items": []}, "scene": {"items": []}}"#;
    match parse_project_json(json) {
        Err(ProjectError::MissingField(field)) => assert_eq!(field, "timeline.keyframes"),
        other => panic!("expected MissingField, got {other:?}"),
    }

    let mut engine = Engine::with_state(sample_state());
    let before = engine.state().clone();
    assert!(engine.load_project(json).is_err());
    assert_eq!(engine.state(), &before);
}

/// it should reject a file where a required collection is not an array
#[test]
fn non_array_items_rejected() {
    let json = r#"{
        "timeline": {"keyframes": []},
        "layers": {"items": {}},
        "scene": {"items": []}
    }"#;
    match parse_project_json(json) {
        Err(ProjectError::NotAnArray(field)) => assert_eq!(field, "layers.items"),
        other => panic!("expected NotAnArray, got {other:?}"),
    }
}

/// it should reject syntactically broken JSON
#[test]
fn malformed_json_rejected() {
    assert!(matches!(
        parse_project_json("{not json"),
        Err(ProjectError::Json(_))
    ));
}

/// it should repair timeline invariants on load
#[test]
fn load_normalizes_timeline() {
    // Unsorted keyframes with a duplicate, one of them without a snapshot,
    // a reversed range and an absurd playhead.
    let json = r#"{
        "timeline": {
            "fps": 0,
            "startFrame": 100,
            "endFrame": 10,
            "currentFrame": 9000,
            "keyframes": [50, 20, 50, 30],
            "keyframeStates": {
                "20": {"scene": {"items": []}, "layers": {"items": []}},
                "50": {"scene": {"items": []}, "layers": {"items": []}}
            }
        },
        "layers": {"items": []},
        "scene": {"items": []}
    }"#;
    let file = parse_project_json(json).unwrap();
    assert_eq!(file.timeline.fps, 1);
    assert_eq!(file.timeline.start_frame, 10);
    assert_eq!(file.timeline.end_frame, 100);
    assert_eq!(file.timeline.current_frame, 100);
    // 30 has no snapshot and is dropped; duplicates collapse.
    assert_eq!(file.timeline.keyframes, vec![20, 50]);
    assert_eq!(file.timeline.snapshots.len(), 2);
    // Loop is on when the file does not say otherwise.
    assert!(file.timeline.loop_enabled);
}

/// it should revalidate the active layer on load
#[test]
fn load_revalidates_active_layer() {
    let json = r#"{
        "timeline": {"keyframes": []},
        "layers": {
            "items": [{"id": 0, "name": "Décor", "visible": true, "locked": true, "kind": "background"}],
            "activeLayerId": 42
        },
        "scene": {"items": []}
    }"#;
    let mut engine = Engine::new();
    engine.load_project(json).unwrap();
    assert_eq!(engine.state().layers.active_layer_id, Some(EntityId(0)));
}

/// it should report manifest-unknown member and variant keys
#[test]
fn manifest_flags_unknown_keys() {
    let manifest = RigManifest::parse(
        r#"{
            "pantins": {
                "/pantins/macron.svg": {
                    "members": ["bras_droit", "bras_gauche"],
                    "variantGroups": {"bouche": ["sourire", "neutre"]}
                }
            }
        }"#,
    )
    .unwrap();

    let mut state = sample_state();
    state = reduce(
        &state,
        &Action::SetMemberRotation {
            item_id: EntityId(1),
            member_id: "queue".into(),
            degrees: 10.0,
        },
    );
    let item = state.scene.item(EntityId(1)).unwrap();
    let unknown = manifest.unknown_keys(item);
    assert_eq!(unknown, vec!["queue".to_string()]);

    // Assets absent from the manifest are never flagged.
    let spec = manifest.spec_for("/pantins/autre.svg");
    assert!(spec.is_none());
}

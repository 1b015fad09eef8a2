use craftsmen_core::{
    Event, Position, Rejection, Score, ScoreCoefficients, Side, TerrainKind, TerritoryState,
    UnitId,
};
use craftsmen_protocol::{decode_batch, replay, ChildAction, Field, TurnActions};
use craftsmen_system_scoring::compute_points;

const SNAPSHOT: &str = r#"{
    "name": "practice",
    "width": 5,
    "height": 5,
    "castle_coeff": 10,
    "wall_coeff": 1,
    "territory_coeff": 1,
    "ponds": "[{\"x\": 4, \"y\": 0}]",
    "castles": "[{\"x\": 2, \"y\": 2}]",
    "craftsmen": "[{\"x\": 2, \"y\": 1, \"side\": \"A\", \"id\": \"a1\"}, {\"x\": 2, \"y\": 3, \"side\": \"A\", \"id\": \"a2\"}, {\"x\": 0, \"y\": 4, \"side\": \"B\", \"id\": \"b1\"}]"
}"#;

fn wire(id: &str, action: &str, param: Option<&str>) -> ChildAction {
    ChildAction::new(id, action, param)
}

#[test]
fn string_encoded_lists_build_the_board() {
    let field = Field::from_json(SNAPSHOT).expect("snapshot");
    let board = field.to_board().expect("board");

    assert_eq!(board.dimensions(), (5, 5));
    assert_eq!(board.terrain_at(Position::new(4, 0)), Ok(TerrainKind::Pond));
    assert_eq!(board.terrain_at(Position::new(2, 2)), Ok(TerrainKind::Castle));
    assert_eq!(board.units_of(Side::A).count(), 2);
    assert_eq!(board.unit_at(Position::new(0, 4)), Some(&UnitId::new("b1")));
    assert_eq!(field.coefficients(), ScoreCoefficients::default());
}

#[test]
fn plain_lists_are_accepted_too() {
    let field = Field::from_json(
        r#"{"width": 4, "height": 4, "castles": [{"x": 1, "y": 1}], "craftsmen": []}"#,
    )
    .expect("snapshot");
    let board = field.to_board().expect("board");
    assert_eq!(board.terrain_at(Position::new(1, 1)), Ok(TerrainKind::Castle));
}

#[test]
fn legacy_identifier_field_is_understood() {
    let actions: Vec<ChildAction> = serde_json::from_str(
        r#"[
            {"crafts_man_id": "a1", "action": "stay"},
            {"craftsman_id": "a2", "action": "MOVE", "action_param": "LOWER_LEFT"},
            {"craftsman_id": "b1", "action": "BUILD", "action_param": null}
        ]"#,
    )
    .expect("actions");
    let batch = decode_batch(&actions);

    assert_eq!(batch.len(), 2, "the BUILD without direction is skipped");
    assert!(batch.get(&UnitId::new("a1")).is_some());
    assert!(batch.get(&UnitId::new("b1")).is_none());
}

#[test]
fn replay_uses_the_last_record_per_turn() {
    let field = Field::from_json(SNAPSHOT).expect("snapshot");
    let mut board = field.to_board().expect("board");

    // The second record for turn 2 supersedes the first. Turn 4 lies past the
    // replay limit.
    let log = vec![
        TurnActions {
            turn: 2,
            actions: vec![wire("a1", "STAY", None), wire("a2", "STAY", None)],
        },
        TurnActions {
            turn: 1,
            actions: vec![wire("b1", "MOVE", Some("UP"))],
        },
        TurnActions {
            turn: 2,
            actions: vec![
                wire("a1", "BUILD", Some("LEFT")),
                wire("a2", "BUILD", Some("RIGHT")),
            ],
        },
        TurnActions {
            turn: 4,
            actions: vec![
                wire("a1", "MOVE", Some("LOWER_LEFT")),
                wire("a2", "MOVE", Some("UPPER_RIGHT")),
            ],
        },
    ];

    let mut events = Vec::new();
    let turns = replay(&mut board, &log, Some(3), &mut events);

    assert_eq!(turns, 2);
    assert_eq!(events.len(), 3);
    assert_eq!(board.unit_at(Position::new(0, 3)), Some(&UnitId::new("b1")));
    assert_eq!(board.terrain_at(Position::new(1, 1)), Ok(TerrainKind::WallA));
    assert_eq!(board.terrain_at(Position::new(3, 3)), Ok(TerrainKind::WallA));
    assert_eq!(board.unit_at(Position::new(2, 1)), Some(&UnitId::new("a1")));
    assert_eq!(
        board.territory_at(Position::new(2, 2)),
        Ok(TerritoryState::None),
        "two diagonal walls do not enclose anything"
    );
    assert_eq!(
        compute_points(&board, &field.coefficients()),
        Score { a: 2, b: 0 }
    );
}

#[test]
fn replay_reports_rejected_actions() {
    let field = Field::from_json(SNAPSHOT).expect("snapshot");
    let mut board = field.to_board().expect("board");
    let log = vec![TurnActions {
        turn: 1,
        actions: vec![
            wire("b1", "MOVE", Some("LOWER_LEFT")),
            wire("ghost", "STAY", None),
        ],
    }];

    let mut events = Vec::new();
    let _ = replay(&mut board, &log, None, &mut events);

    assert!(events.contains(&Event::ActionRejected {
        unit: UnitId::new("b1"),
        kind: craftsmen_core::ActionKind::Move(craftsmen_core::Direction8::LowerLeft),
        rejection: Rejection::OutOfBounds,
    }));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::ActionRejected {
            rejection: Rejection::UnknownUnit,
            ..
        }
    )));
}

#[test]
fn a_full_ring_from_the_log_scores_the_castle() {
    let field = Field {
        width: 5,
        height: 5,
        castles: vec![craftsmen_protocol::PointResp { x: 2, y: 2 }],
        craftsmen: vec![
            craftsmen_protocol::CraftsmanResp {
                x: 1,
                y: 1,
                side: Side::A,
                id: UnitId::new("a1"),
            },
            craftsmen_protocol::CraftsmanResp {
                x: 3,
                y: 3,
                side: Side::A,
                id: UnitId::new("a2"),
            },
        ],
        ..Field::default()
    };
    let mut board = field.to_board().expect("board");
    let log = vec![TurnActions {
        turn: 2,
        actions: vec![
            wire("a1", "BUILD", Some("RIGHT")),
            wire("a2", "BUILD", Some("LEFT")),
        ],
    }, TurnActions {
        turn: 4,
        actions: vec![
            wire("a1", "BUILD", Some("BELOW")),
            wire("a2", "BUILD", Some("ABOVE")),
        ],
    }];

    let _ = replay(&mut board, &log, None, &mut Vec::new());

    assert_eq!(
        board.territory_at(Position::new(2, 2)),
        Ok(TerritoryState::ClosedA)
    );
    assert_eq!(
        compute_points(&board, &field.coefficients()),
        Score { a: 4 + 10, b: 0 }
    );
}

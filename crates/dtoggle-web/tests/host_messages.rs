#![cfg(feature = "input-parser")]
#![forbid(unsafe_code)]

//! JSON message flows through [`ToggleHost`], as a dashboard page drives it.

use dtoggle_core::{BinaryState, RecordingSink};
use dtoggle_web::{HostEvent, InputParseError, ToggleHost};
use dtoggle_widgets::{ListenerCommand, ListenerRegistry};
use pretty_assertions::assert_eq;

const GEOMETRY_OFF: &str = r#"{"thumb_offset":{"left":5,"top":105},
    "thumb_size":{"width":100,"height":100},"track_size":{"width":110,"height":210}}"#;

fn push(host: &mut ToggleHost<RecordingSink>, json: &str) {
    assert!(host.push_json(json).expect("valid message"), "{json}");
}

#[test]
fn lock_drag_over_json() {
    let mut host =
        ToggleHost::from_config_json(r#"{"entity":"lock.front_door"}"#, RecordingSink::new())
            .expect("config");

    push(
        &mut host,
        r#"{"kind":"states","states":{"lock.front_door":{"state":"locked"}}}"#,
    );
    push(
        &mut host,
        &format!(
            r#"{{"kind":"pointer","phase":"down","target":"thumb","pointer":"touch","x":40,"y":160,"geometry":{GEOMETRY_OFF}}}"#
        ),
    );
    push(
        &mut host,
        r#"{"kind":"pointer","phase":"move","pointer":"touch","x":40,"y":30}"#,
    );
    push(
        &mut host,
        r#"{"kind":"pointer","phase":"up","pointer":"touch","x":40,"y":30}"#,
    );
    assert_eq!(host.pump(), 4);

    let outputs = host.take_outputs();
    assert_eq!(
        outputs.listener_commands,
        vec![ListenerCommand::Attach, ListenerCommand::Detach]
    );
    assert_eq!(outputs.commands_issued, 1);
    let call = &host.sink().calls()[0];
    assert_eq!(
        call.to_json_string().unwrap(),
        r#"{"domain":"lock","service":"unlock","service_data":{"entity_id":"lock.front_door"}}"#
    );
    assert_eq!(host.render().unwrap().side, BinaryState::On);

    // The backend has not caught up yet; the same state arrives again.
    push(
        &mut host,
        r#"{"kind":"states","states":{"lock.front_door":{"state":"locked"}}}"#,
    );
    host.pump();
    assert_eq!(host.render().unwrap().side, BinaryState::On);

    push(
        &mut host,
        r#"{"kind":"states","states":{"lock.front_door":{"state":"unlocked"}}}"#,
    );
    host.pump();
    assert_eq!(host.toggle().optimistic(), None);
    assert_eq!(host.render().unwrap().side, BinaryState::On);
}

#[test]
fn disconnect_mid_drag_detaches_listeners() {
    let registry = ListenerRegistry::new();
    let config = dtoggle_core::ToggleConfig::for_entity("switch.fan").expect("config");
    let mut host = ToggleHost::with_registry(config, registry.clone(), RecordingSink::new());

    push(
        &mut host,
        r#"{"kind":"states","states":{"switch.fan":{"state":"off"}}}"#,
    );
    push(
        &mut host,
        &format!(
            r#"{{"kind":"pointer","phase":"down","target":"thumb","x":0,"y":0,"geometry":{GEOMETRY_OFF}}}"#
        ),
    );
    host.pump();
    assert_eq!(registry.live_count(), 4);

    push(&mut host, r#"{"kind":"disconnect"}"#);
    host.pump();
    assert_eq!(registry.live_count(), 0);
    assert!(host.sink().is_empty());
}

#[test]
fn geometry_loss_turns_release_into_no_op() {
    let mut host = ToggleHost::from_config_json(r#"{"entity":"switch.fan"}"#, RecordingSink::new())
        .expect("config");
    host.push(HostEvent::States(
        dtoggle_core::StateSnapshot::new().with("switch.fan", "off"),
    ));
    push(
        &mut host,
        &format!(
            r#"{{"kind":"pointer","phase":"down","target":"thumb","x":0,"y":200,"geometry":{GEOMETRY_OFF}}}"#
        ),
    );
    push(&mut host, r#"{"kind":"pointer","phase":"move","x":0,"y":0}"#);
    push(&mut host, r#"{"kind":"geometry_lost"}"#);
    push(&mut host, r#"{"kind":"pointer","phase":"up","x":0,"y":0}"#);
    host.pump();
    assert!(host.sink().is_empty());
    assert_eq!(host.render().unwrap().side, BinaryState::Off);
}

#[test]
fn malformed_messages_are_rejected_and_not_queued() {
    let mut host = ToggleHost::from_config_json(r#"{"entity":"switch.fan"}"#, RecordingSink::new())
        .expect("config");
    assert!(matches!(
        host.push_json("nope"),
        Err(InputParseError::Json(_))
    ));
    assert_eq!(host.push_json(r#"{"kind":"hover"}"#), Ok(false));
    assert_eq!(host.pending(), 0);
}

//! # End-to-End Command Flows
//!
//! Sign on the controller side, deliver raw bytes to the dispatcher, observe
//! acks on the bus.
//!
//! ## Flows Tested:
//!
//! 1. **K → accept**: a command signed with the device key completes
//! 2. **K' → reject**: the same command signed with another key is `AUTH_INVALID`
//! 3. **HMAC-SHA1 → reject**: refused before any MAC is computed
//! 4. **Duplicate delivery**: the handler runs once, acks are replayed
//! 5. **Key order**: reordered parameters verify against the same MAC
//! 6. **Eviction**: FIFO eviction lets the oldest id reach the handler again
//! 7. **Oversized payloads**: dropped on length before decoding, no ack

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use cg_01_command_auth::{
        build_signing_string, verify, AuthError, CommandAuthApi, CommandAuthService,
    };
    use cg_02_command_dispatch::{
        BusAckSink, CommandDispatchApi, CommandDispatcher, CommandHandler, DispatchOutcome,
        DispatcherConfig, HandlerOutcome, IgnoreReason, RejectSource, TerminalOutcome,
    };
    use serde_json::json;
    use shared_bus::{InMemoryBroker, Subscription, TopicFilter};
    use shared_types::{AckStatus, CommandAck, CommandEnvelope, ReasonCode};
    use std::sync::Arc;

    const CMD_TOPIC: &str = "room/room1/device/door1/cmd";

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Records every command that reaches the device.
    #[derive(Default)]
    struct DeviceSpy {
        executed: Vec<String>,
    }

    impl CommandHandler for DeviceSpy {
        fn handle(&mut self, command: &CommandEnvelope) -> HandlerOutcome {
            self.executed.push(command.command_id.clone());
            if command.action == "JAM" {
                HandlerOutcome::reject("MOTOR_STALLED")
            } else {
                HandlerOutcome::Accept
            }
        }
    }

    type Harness =
        CommandDispatcher<CommandAuthService, DeviceSpy, BusAckSink<Arc<InMemoryBroker>>>;

    fn harness(capacity: usize) -> (Harness, Subscription) {
        let broker = Arc::new(InMemoryBroker::new());
        let config =
            DispatcherConfig::new(ROOM_ID, DEVICE_ID).with_idempotency_capacity(capacity);
        let topics = config.topics();
        let acks = broker.subscribe(TopicFilter::exact(topics.ack()).unwrap());
        let dispatcher = CommandDispatcher::new(
            config,
            CommandAuthService::new(device_secret()),
            DeviceSpy::default(),
            BusAckSink::new(Arc::clone(&broker), topics.ack()),
        )
        .unwrap();
        (dispatcher, acks)
    }

    fn deliver(dispatcher: &mut Harness, cmd: &CommandEnvelope) -> DispatchOutcome {
        dispatcher.process(CMD_TOPIC, to_line(cmd).as_bytes())
    }

    fn drain(acks: &mut Subscription) -> Vec<CommandAck> {
        let mut out = Vec::new();
        while let Ok(Some(message)) = acks.try_recv() {
            out.push(serde_json::from_slice(&message.payload).unwrap());
        }
        out
    }

    fn statuses(acks: &[CommandAck]) -> Vec<(AckStatus, Option<&str>)> {
        acks.iter()
            .map(|a| (a.status, a.reason_code.as_deref()))
            .collect()
    }

    // =============================================================================
    // AUTHENTICATION
    // =============================================================================

    #[test]
    fn test_signed_with_device_key_is_accepted() {
        let (mut dispatcher, mut acks) = harness(16);
        let cmd = signed_command("open-1", &device_secret());

        assert!(verify(&cmd, Some(&device_secret())).is_ok());
        assert_eq!(deliver(&mut dispatcher, &cmd), DispatchOutcome::Completed);

        let acks = drain(&mut acks);
        assert_eq!(
            statuses(&acks),
            vec![(AckStatus::Accepted, None), (AckStatus::Completed, None)]
        );
        assert!(acks.iter().all(|a| a.command_id == "open-1"));
        assert!(acks.iter().all(|a| a.correlation_id == "corr-open-1"));
        assert!(acks.iter().all(|a| a.observed_at_unix_ms > 0));
        assert_eq!(dispatcher.handler().executed, vec!["open-1".to_owned()]);
    }

    #[test]
    fn test_signed_with_foreign_key_is_auth_invalid() {
        let (mut dispatcher, mut acks) = harness(16);
        let cmd = signed_command("open-2", &foreign_secret());

        assert_eq!(
            verify(&cmd, Some(&device_secret())),
            Err(AuthError::MacMismatch)
        );
        assert_eq!(
            deliver(&mut dispatcher, &cmd),
            DispatchOutcome::Rejected {
                reason: ReasonCode::truncating("AUTH_INVALID"),
                source: RejectSource::Authentication,
            }
        );
        assert_eq!(
            statuses(&drain(&mut acks)),
            vec![(AckStatus::Rejected, Some("AUTH_INVALID"))]
        );
        assert!(dispatcher.handler().executed.is_empty());
        assert!(!dispatcher.cache().contains("open-2"));
    }

    #[test]
    fn test_hmac_sha1_rejected_before_mac() {
        let (mut dispatcher, mut acks) = harness(16);
        let mut cmd = signed_command("open-3", &device_secret());
        cmd.auth.alg = "HMAC-SHA1".into();
        // Not hex at all: a decode error would surface if the MAC were examined.
        cmd.auth.mac_hex = "not-a-mac".into();

        assert_eq!(
            verify(&cmd, Some(&device_secret())),
            Err(AuthError::AlgorithmUnsupported)
        );
        assert!(matches!(
            deliver(&mut dispatcher, &cmd),
            DispatchOutcome::Rejected {
                source: RejectSource::Authentication,
                ..
            }
        ));
        assert_eq!(
            statuses(&drain(&mut acks)),
            vec![(AckStatus::Rejected, Some("AUTH_INVALID"))]
        );
        assert!(dispatcher.handler().executed.is_empty());
    }

    #[test]
    fn test_tampered_field_is_auth_invalid() {
        let (mut dispatcher, mut acks) = harness(16);
        let mut cmd = signed_command("open-4", &device_secret());
        cmd.sequence += 1;

        assert!(matches!(
            deliver(&mut dispatcher, &cmd),
            DispatchOutcome::Rejected { .. }
        ));
        assert_eq!(drain(&mut acks)[0].reason_code.as_deref(), Some("AUTH_INVALID"));
    }

    #[test]
    fn test_oversized_parameters_fail_closed() {
        let (mut dispatcher, mut acks) = harness(16);
        let mut cmd = signed_command("deep-1", &device_secret());
        cmd.parameters = nested_parameters(11);

        assert!(matches!(
            verify(&cmd, Some(&device_secret())),
            Err(AuthError::CanonicalizationOverflow(_))
        ));
        deliver(&mut dispatcher, &cmd);
        assert_eq!(
            statuses(&drain(&mut acks)),
            vec![(AckStatus::Rejected, Some("AUTH_INVALID"))]
        );

        let wide = signed_action("wide-1", "SET", wide_parameters(64), &device_secret());
        assert_eq!(deliver(&mut dispatcher, &wide), DispatchOutcome::Completed);
    }

    // =============================================================================
    // IDEMPOTENCY
    // =============================================================================

    #[test]
    fn test_duplicate_runs_handler_once_and_replays() {
        let (mut dispatcher, mut acks) = harness(16);
        let cmd = signed_command("dup-1", &device_secret());

        assert_eq!(deliver(&mut dispatcher, &cmd), DispatchOutcome::Completed);
        let first = drain(&mut acks);

        assert_eq!(
            deliver(&mut dispatcher, &cmd),
            DispatchOutcome::Replayed(TerminalOutcome::Completed)
        );
        let second = drain(&mut acks);

        assert_eq!(dispatcher.handler().executed.len(), 1);
        assert_eq!(statuses(&first), statuses(&second));
    }

    #[test]
    fn test_duplicate_rejection_replays_handler_reason() {
        let (mut dispatcher, mut acks) = harness(16);
        let cmd = signed_action("jam-1", "JAM", json!({}), &device_secret());

        deliver(&mut dispatcher, &cmd);
        deliver(&mut dispatcher, &cmd);

        assert_eq!(dispatcher.handler().executed.len(), 1);
        assert_eq!(
            statuses(&drain(&mut acks)),
            vec![
                (AckStatus::Rejected, Some("MOTOR_STALLED")),
                (AckStatus::Rejected, Some("MOTOR_STALLED")),
            ]
        );
    }

    #[test]
    fn test_auth_failure_does_not_poison_cache() {
        let (mut dispatcher, _acks) = harness(16);
        let forged = signed_command("shared-id", &foreign_secret());
        let genuine = signed_command("shared-id", &device_secret());

        deliver(&mut dispatcher, &forged);
        assert_eq!(deliver(&mut dispatcher, &genuine), DispatchOutcome::Completed);
        assert_eq!(dispatcher.handler().executed, vec!["shared-id".to_owned()]);
    }

    #[test]
    fn test_fifo_eviction_readmits_oldest() {
        let (mut dispatcher, _acks) = harness(2);
        let first = signed_command("evict-1", &device_secret());
        let second = signed_command("evict-2", &device_secret());
        let third = signed_command("evict-3", &device_secret());

        deliver(&mut dispatcher, &first);
        deliver(&mut dispatcher, &second);
        // Re-delivery does not consume a slot.
        deliver(&mut dispatcher, &second);
        deliver(&mut dispatcher, &third);

        assert!(!dispatcher.cache().contains("evict-1"));
        assert!(dispatcher.cache().contains("evict-2"));
        assert!(dispatcher.cache().contains("evict-3"));

        assert_eq!(deliver(&mut dispatcher, &first), DispatchOutcome::Completed);
        assert!(matches!(
            deliver(&mut dispatcher, &third),
            DispatchOutcome::Replayed(_)
        ));
        assert_eq!(
            dispatcher.handler().executed,
            vec!["evict-1", "evict-2", "evict-3", "evict-1"]
        );
    }

    #[test]
    fn test_generated_ids_are_cached() {
        let (mut dispatcher, _acks) = harness(16);
        let id = fresh_command_id();
        let cmd = signed_command(&id, &device_secret());

        deliver(&mut dispatcher, &cmd);
        assert!(dispatcher.cache().contains(&id));
    }

    // =============================================================================
    // CANONICALIZATION ACROSS THE WIRE
    // =============================================================================

    #[test]
    fn test_parameter_key_order_is_irrelevant() {
        let auth = CommandAuthService::new(device_secret());
        let signed = signed_action(
            "order-1",
            "MOVE",
            json!({"b": 1, "a": {"y": [1, 2], "x": "z"}}),
            &device_secret(),
        );

        let reordered_wire = format!(
            r#"{{"auth":{{"mac_hex":"{mac}","alg":"HMAC-SHA256"}},
                "parameters":{{"a":{{"x":"z","y":[1,2]}},"b":1}},
                "safety_class":"CRITICAL","action":"MOVE",
                "issued_at_unix_ms":1700000000123,"sequence":7,
                "correlation_id":"corr-order-1","command_id":"order-1",
                "device_id":"door1","room_id":"room1","schema":"v8"}}"#,
            mac = signed.auth.mac_hex
        );
        let reordered = CommandEnvelope::from_slice(reordered_wire.as_bytes()).unwrap();

        assert_eq!(
            build_signing_string(&signed).unwrap(),
            build_signing_string(&reordered).unwrap()
        );
        assert!(auth.is_authentic(&reordered));
    }

    // =============================================================================
    // ROUTING
    // =============================================================================

    #[test]
    fn test_misaddressed_and_garbage_are_silent() {
        let (mut dispatcher, mut acks) = harness(16);
        let mut other_device = signed_command("route-1", &device_secret());
        other_device.device_id = "window9".into();

        assert_eq!(
            deliver(&mut dispatcher, &other_device),
            DispatchOutcome::Ignored(IgnoreReason::NotAddressed)
        );
        assert_eq!(
            dispatcher.process(CMD_TOPIC, b"\xff\xfe{"),
            DispatchOutcome::Ignored(IgnoreReason::Malformed)
        );
        assert_eq!(
            dispatcher.process(
                "room/room1/device/door1/ack",
                to_line(&signed_command("route-2", &device_secret())).as_bytes()
            ),
            DispatchOutcome::Ignored(IgnoreReason::WrongTopic)
        );
        assert!(drain(&mut acks).is_empty());
        assert!(dispatcher.handler().executed.is_empty());
    }

    #[test]
    fn test_oversized_payload_dropped_without_verification() {
        let (mut dispatcher, mut acks) = harness(16);
        let samples: Vec<f64> = (0..50_000).map(|i| f64::from(i) * 0.25).collect();
        let bulky = signed_action("bulk-1", "SET", json!({ "samples": samples }), &device_secret());
        let line = to_line(&bulky);
        assert!(line.len() > dispatcher.config().max_payload_bytes);

        assert_eq!(
            dispatcher.process(CMD_TOPIC, line.as_bytes()),
            DispatchOutcome::Ignored(IgnoreReason::Oversized)
        );
        assert!(drain(&mut acks).is_empty());
        assert!(dispatcher.handler().executed.is_empty());
        assert!(!dispatcher.cache().contains("bulk-1"));

        // A normal command right after is unaffected.
        let open = signed_command("bulk-2", &device_secret());
        assert_eq!(deliver(&mut dispatcher, &open), DispatchOutcome::Completed);
    }
}

//! # Device Runtime Bus Flows
//!
//! Drives the device runtime the way the executable does: wire lines in,
//! ack lines out, with controllers attached to the same broker.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use device_runtime::{DeviceConfig, DeviceRuntime, RunSummary};
    use serde_json::json;
    use shared_bus::{BusMessage, MessagePublisher, QoS, TopicFilter};
    use shared_types::{AckStatus, CommandAck};
    use std::time::Duration;
    use tokio::time::timeout;

    fn runtime() -> DeviceRuntime {
        DeviceRuntime::new(DeviceConfig {
            room_id: ROOM_ID.into(),
            device_id: DEVICE_ID.into(),
            secret: Some(device_secret()),
            idempotency_capacity: 16,
            bus_capacity: 128,
            max_payload_bytes: 2048,
        })
        .unwrap()
    }

    fn ack_lines(output: &[u8]) -> Vec<CommandAck> {
        std::str::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_mixed_session_over_stdio() {
        let mut runtime = runtime();
        let open = to_line(&signed_command("s-1", &device_secret()));
        let forged = to_line(&signed_command("s-2", &foreign_secret()));
        let unsupported = to_line(&signed_action("s-3", "LEVITATE", json!({}), &device_secret()));
        let input = [open.as_str(), "", forged.as_str(), unsupported.as_str(), open.as_str(), "{"]
            .join("\n");
        let mut output = Vec::new();

        let summary = timeout(
            Duration::from_secs(5),
            runtime.run(input.as_bytes(), &mut output),
        )
        .await
        .expect("runtime finished")
        .unwrap();

        assert_eq!(
            summary,
            RunSummary {
                published: 5,
                ignored: 1,
                rejected: 2,
                completed: 1,
                replayed: 1,
                acks_written: 6,
            }
        );

        let acks = ack_lines(&output);
        let trail: Vec<(&str, AckStatus, Option<&str>)> = acks
            .iter()
            .map(|a| (a.command_id.as_str(), a.status, a.reason_code.as_deref()))
            .collect();
        assert_eq!(
            trail,
            vec![
                ("s-1", AckStatus::Accepted, None),
                ("s-1", AckStatus::Completed, None),
                ("s-2", AckStatus::Rejected, Some("AUTH_INVALID")),
                ("s-3", AckStatus::Rejected, Some("UNSUPPORTED_ACTION")),
                ("s-1", AckStatus::Accepted, None),
                ("s-1", AckStatus::Completed, None),
            ]
        );
        assert!(acks.iter().all(|a| a.room_id == ROOM_ID && a.device_id == DEVICE_ID));
        assert_eq!(runtime.handler().executed().len(), 1);
    }

    #[tokio::test]
    async fn test_controller_receives_acks_via_wildcard() {
        let mut runtime = runtime();
        let broker = runtime.broker();
        let mut controller = broker.subscribe(TopicFilter::new("room/room1/#").unwrap());

        let id = fresh_command_id();
        broker
            .publish(BusMessage::new(
                "room/room1/device/door1/cmd",
                to_line(&signed_command(&id, &device_secret())),
                QoS::AtLeastOnce,
            ))
            .unwrap();

        let mut summary = RunSummary::default();
        runtime.pump(&mut summary);
        assert_eq!(summary.completed, 1);

        // The controller sees its own command first, then both acks.
        let mut seen = Vec::new();
        for _ in 0..3 {
            let message = timeout(Duration::from_secs(1), controller.recv())
                .await
                .expect("message delivered")
                .expect("broker alive");
            seen.push(message);
        }
        assert!(seen[0].topic.ends_with("/cmd"));
        let statuses: Vec<AckStatus> = seen[1..]
            .iter()
            .map(|m| serde_json::from_slice::<CommandAck>(&m.payload).unwrap().status)
            .collect();
        assert_eq!(statuses, vec![AckStatus::Accepted, AckStatus::Completed]);
        assert!(seen[1..].iter().all(|m| m.qos == QoS::AtLeastOnce && !m.retain));
    }

    #[tokio::test]
    async fn test_commands_for_other_devices_are_not_delivered() {
        let mut runtime = runtime();
        let broker = runtime.broker();
        let mut other = signed_command("x-1", &device_secret());
        other.device_id = "window9".into();

        broker
            .publish(BusMessage::new(
                "room/room1/device/window9/cmd",
                to_line(&other),
                QoS::AtLeastOnce,
            ))
            .unwrap();

        let mut summary = RunSummary::default();
        runtime.pump(&mut summary);
        let mut output = Vec::new();
        runtime.flush_acks(&mut output, &mut summary).await.unwrap();

        assert_eq!(summary, RunSummary::default());
        assert!(output.is_empty());
    }
}

//! End-to-end controller exercises over the loopback transport
//!
//! Drives the shared controller exactly the way a front-end worker does:
//! commands in, poll ticks, telemetry out, with the far end scripted.

use filacon_core::{
    Command, DeviceController, Direction, LoopbackTransport, ParamKind, UNKNOWN_TEMPERATURE,
};

#[tokio::test]
async fn full_operating_cycle() {
    let (transport, device) = LoopbackTransport::new();
    let mut controller = DeviceController::new();
    controller
        .connect_with(Box::new(transport), "bench")
        .await
        .unwrap();
    assert!(controller.is_connected());

    // Power up: setpoints go out before the master switch
    controller.set_system(true).await;
    assert_eq!(
        device.sent_lines(),
        vec!["SET_TEMP,120.00", "SET_MOTOR_TEMP,180.00", "SET_STATE,ON"]
    );

    // Firmware acknowledges with a full frame
    device.feed_line("DATA,24.80,1,0,1,40.00,120.00,180.00");
    controller.tick().await;
    let state = controller.device_state();
    assert!(state.system_on);
    assert!(state.heater_on);
    assert_eq!(state.temperature_c, 24.80);

    // User bumps the velocity twice while heating
    controller.nudge(ParamKind::Velocity, Direction::Up).await;
    controller.nudge(ParamKind::Velocity, Direction::Up).await;
    let lines = device.sent_lines();
    assert_eq!(&lines[lines.len() - 2..], ["SET_VEL,40.50", "SET_VEL,41.00"]);

    // Heat-up telemetry streams in, last write wins
    for temp in ["90.00", "150.00", "181.25"] {
        device.feed_line(&format!("DATA,{temp},1,1,1,41.00,120.00,180.00"));
    }
    controller.tick().await;
    assert_eq!(controller.device_state().temperature_c, 181.25);
    assert!(controller.device_state().motor_on);

    // Noise between frames changes nothing
    let before = controller.device_state();
    device.feed_line("DATA,oops");
    device.feed(b"\x00\xff junk without newline");
    controller.tick().await;
    assert_eq!(controller.device_state(), before);

    // Orderly shutdown
    controller.set_system(false).await;
    assert_eq!(device.sent_lines().last().unwrap(), "SET_STATE,OFF");

    controller.disconnect().await;
    assert!(!controller.is_connected());
    assert_eq!(controller.device_state().temperature_c, UNKNOWN_TEMPERATURE);
}

#[tokio::test]
async fn cable_pull_mid_session() {
    let (transport, device) = LoopbackTransport::new();
    let mut controller = DeviceController::new();
    controller
        .connect_with(Box::new(transport), "bench")
        .await
        .unwrap();

    device.feed_line("DATA,200.00,1,1,1,40.00,245.00,180.00");
    controller.tick().await;
    assert!(controller.device_state().has_reading());

    // The cable comes out: the next drain fails
    device.fail_reads(true);
    controller.tick().await;

    assert!(!controller.is_connected());
    assert!(!controller.device_state().has_reading());
    assert!(controller.status().starts_with("Disconnected"));

    // Controls pressed after the failure write nothing and do not error
    let written = device.sent().len();
    controller.toggle_heater().await;
    controller.nudge(ParamKind::TargetTemp, Direction::Up).await;
    assert!(!controller.apply_configuration().await);
    assert_eq!(device.sent().len(), written);

    // Local parameter edits still work (and still clamp) while offline
    for _ in 0..500 {
        controller.nudge(ParamKind::TargetTemp, Direction::Up).await;
    }
    assert_eq!(controller.parameters().target_temp.value, 300.0);
}

#[tokio::test]
async fn reconnect_after_failure_restores_service() {
    let (transport, device) = LoopbackTransport::new();
    let mut controller = DeviceController::new();
    controller
        .connect_with(Box::new(transport), "bench")
        .await
        .unwrap();

    device.fail_reads(true);
    controller.tick().await;
    assert!(!controller.is_connected());

    // The user re-initiates with a fresh transport; no automatic retry
    let (transport, device) = LoopbackTransport::new();
    controller
        .connect_with(Box::new(transport), "bench")
        .await
        .unwrap();
    assert!(controller.is_connected());

    controller.toggle_heater().await;
    assert_eq!(device.sent_lines(), vec!["SET_HEATER,ON"]);
}

#[tokio::test]
async fn reference_frame_decodes_exactly() {
    let (transport, device) = LoopbackTransport::new();
    let mut controller = DeviceController::new();
    controller
        .connect_with(Box::new(transport), "bench")
        .await
        .unwrap();

    device.feed_line("DATA,45.50,1,0,1,40.00,120.00,90.00");
    controller.tick().await;

    let state = controller.device_state();
    assert_eq!(state.temperature_c, 45.50);
    assert!(state.heater_on);
    assert!(!state.motor_on);
    assert!(state.system_on);
    assert_eq!(state.target_velocity, 40.00);
    assert_eq!(state.target_temp, 120.00);
    assert_eq!(state.motor_engage_temp, 90.00);
}

#[tokio::test]
async fn command_lines_match_wire_grammar() {
    // Cross-check the encoder against the grammar the firmware parses
    let cases = [
        (Command::SetSystem(true), "SET_STATE,ON\n"),
        (Command::SetHeater(false), "SET_HEATER,OFF\n"),
        (Command::SetMotor(true), "SET_MOTOR,ON\n"),
        (Command::SetVelocity(40.0), "SET_VEL,40.00\n"),
        (Command::SetTargetTemp(120.0), "SET_TEMP,120.00\n"),
        (Command::SetMotorEngageTemp(90.0), "SET_MOTOR_TEMP,90.00\n"),
        (
            Command::Configure {
                velocity: 40.0,
                max_temp: 260.0,
                motor_engage_temp: 180.0,
            },
            "SET,40.00,260.00,180.00\n",
        ),
    ];
    for (command, wire) in cases {
        assert_eq!(command.encode(), wire);
    }
}

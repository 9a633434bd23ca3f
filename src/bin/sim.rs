use dryer_controller::clock::{tick_task, CLOCK};
use dryer_controller::display_std::ConsoleDisplay;
use dryer_controller::dryer_controller::Dryer;
use dryer_controller::encoder::{EncoderDecoder, ENCODER_EVENT};
use dryer_controller::inputs::{demo_user_task, SimEncoder, SIM_LEVEL};
use dryer_controller::outputs::{SimBeeper, SimHeater};
use dryer_controller::temperature_sensor::MockSensor;
use embassy_executor::Spawner;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_millis()
        .init();

    spawner.spawn(tick_task()).unwrap();
    spawner.spawn(demo_user_task()).unwrap();

    let mut dryer = Dryer::new(
        EncoderDecoder::new(SimEncoder::new(&SIM_LEVEL), &ENCODER_EVENT),
        MockSensor::new(),
        SimHeater,
        ConsoleDisplay::new(),
        SimBeeper,
        &CLOCK,
    );
    dryer.startup().await;
    dryer.run().await
}

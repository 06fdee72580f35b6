use std::cell::RefCell;
use std::rc::Rc;

use flight_simulation::*;

const FRAME_TIME: f64 = 1.0 / 50.0;
const FLIGHT_TIME: f64 = 90.0;
const CLIMB_OUT_HEIGHT: f64 = 30.0; // m
const CLIMB_PITCH: f64 = 0.1; // rad

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let model_config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading flight model config from {}", path);
            FlightModelConfig::from_yaml_file(path)?
        }
        None => FlightModelConfig::default(),
    };

    let session = FlightSession::with_model(
        "c172",
        "wsss",
        "clear",
        Box::new(SixDofModel::new(model_config)),
    )?;
    let ground_elevation = session.environment().ground_elevation;
    let session = Rc::new(RefCell::new(session));
    let telemetry = Rc::new(RefCell::new(Telemetry::new(ground_elevation)));

    let clock = ManualClock::default();
    let mut scheduler = FixedStepScheduler::new(SchedulerConfig::default(), clock.clone())?;
    let handle = scheduler.handle();

    {
        let session = Rc::clone(&session);
        let telemetry = Rc::clone(&telemetry);
        scheduler.subscribe(move |clock_state, dt| {
            let mut session = session.borrow_mut();

            // Full power; the airframe rotates by itself, then hold a climb attitude
            let state = session.state();
            let pitch = if state.altitude_above(ground_elevation) > CLIMB_OUT_HEIGHT {
                ((CLIMB_PITCH - state.euler().pitch) * 2.0).clamp(-1.0, 1.0)
            } else {
                0.0
            };
            session.set_controls(ControlInput::new(pitch, 0.0, 0.0, 1.0, 0.0));

            let state = session.step(dt);
            telemetry.borrow_mut().collect_data(state, clock_state.total_time);
            if state.crashed {
                handle.stop();
            }
        });
    }

    scheduler.start();
    let mut next_report = 10.0;
    while scheduler.is_running() && scheduler.state().total_time < FLIGHT_TIME {
        clock.advance(FRAME_TIME);
        scheduler.frame();

        if scheduler.state().total_time >= next_report {
            if let Some(sample) = telemetry.borrow().latest() {
                log::info!(
                    "t={:.0}s alt={:.0} m ias={:.0} kt vs={:.0} fpm",
                    sample.sim_time,
                    sample.altitude - ground_elevation,
                    sample.airspeed,
                    sample.vertical_speed
                );
            }
            next_report += 10.0;
        }
    }
    scheduler.stop();

    telemetry.borrow().display_data();
    if scheduler.dropped_frames() > 0 {
        log::warn!(
            "{} frames hit the sub-step cap, {} steps dropped",
            scheduler.dropped_frames(),
            scheduler.dropped_steps()
        );
    }

    let store = SaveStore::new(std::env::temp_dir().join("flight_sim").join("last_flight.json"));
    store.save(&session.borrow().to_saved())?;
    log::info!("Flight saved to {}", store.path().display());

    Ok(())
}

use anyhow::Result;

use kuroko_stage::config::StageConfig;
use kuroko_stage::device::GpuInit;
use kuroko_stage::event::StageEvent;
use kuroko_stage::logging::{LoggingConfig, init_logging};
use kuroko_stage::window::{RuntimeConfig, StageRuntime};

mod puppet;

use puppet::PlaceholderPuppet;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    println!();
    println!("  ┌────────────────────────────────────────┐");
    println!("  │   KUROKO VIEWER  ·  placeholder act    │");
    println!("  │   drag to lead the puppet, tap to pet  │");
    println!("  └────────────────────────────────────────┘");
    println!();

    StageRuntime::run(
        RuntimeConfig {
            title: "kuroko viewer".to_string(),
            width: 960.0,
            height: 540.0,
        },
        GpuInit::default(),
        StageConfig::default(),
        PlaceholderPuppet::new(),
        |stage| {
            stage.subscribe(|event| match event {
                StageEvent::HitAreaTapped { area, x, y } => {
                    log::info!("tap landed on {area} at ({x:.2}, {y:.2})");
                }
            });
            stage.change_model("models/hina/hina.puppet.json");
        },
    )
}

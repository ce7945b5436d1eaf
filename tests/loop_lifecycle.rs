use std::sync::Arc;

use windflow_engine::{
    AnimationLoop, FrameScheduler, GridHeader, IdentityBridge, LoopState, ManualScheduler,
    RasterSurface, VectorField, WindCore, WindSettings,
};

fn field(u: f32) -> Arc<VectorField> {
    let header = GridHeader {
        origin_lon: 0.0,
        origin_lat: 0.0,
        cell_width: 1.0,
        cell_height: 1.0,
        column_count: 33,
        row_count: 17,
        reference_time: String::new(),
    };
    let n = 33 * 17;
    Arc::new(VectorField::new(header, &vec![u; n], &vec![0.5; n]).unwrap())
}

/// Pump frames the way a host event loop would.
fn pump(lp: &mut AnimationLoop<ManualScheduler>, core: &mut WindCore, surface: &mut RasterSurface, frames: usize) -> usize {
    let mut ran = 0;
    for _ in 0..frames {
        if !lp.scheduler().is_pending() {
            break;
        }
        if lp.on_frame(core, &IdentityBridge, surface).is_some() {
            ran += 1;
        }
    }
    ran
}

#[test]
fn start_stop_dispose_lifecycle() {
    let settings = WindSettings {
        seed: Some(3),
        ..WindSettings::default()
    };
    let mut core = WindCore::with_settings(32, 16, settings).unwrap();
    let mut surface = RasterSurface::new(32, 16);
    let mut lp = AnimationLoop::new(ManualScheduler::new());

    // teardown before anything ran
    lp.stop();
    assert_eq!(lp.state(), LoopState::Idle);

    core.set_field(field(3.0));
    assert!(lp.start(&mut core, &IdentityBridge));
    assert_eq!(core.particle_count(), 224);
    assert_eq!(pump(&mut lp, &mut core, &mut surface, 30), 30);
    assert_eq!(core.frame(), 30);

    lp.stop();
    lp.stop();
    assert_eq!(pump(&mut lp, &mut core, &mut surface, 5), 0);
    assert_eq!(core.frame(), 30);

    // new dataset while stopped: reseeded, still idle
    lp.replace_field(&mut core, field(-2.0), &IdentityBridge);
    assert_eq!(lp.state(), LoopState::Idle);
    assert!(core.particles().ages().iter().all(|&a| a < 150));

    assert!(lp.start(&mut core, &IdentityBridge));
    assert_eq!(pump(&mut lp, &mut core, &mut surface, 3), 3);

    lp.dispose();
    assert!(!lp.start(&mut core, &IdentityBridge));
    assert_eq!(pump(&mut lp, &mut core, &mut surface, 3), 0);
    assert_eq!(core.frame(), 33);
}

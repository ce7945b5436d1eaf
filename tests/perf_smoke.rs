use windflow_engine::{
    field_from_json, Projection, RasterSurface, WindCore, WindSettings, ViewportBridge,
};

/// Global 10-degree grid in the backend's record-pair shape, north-up.
fn global_payload() -> String {
    let (nx, ny) = (36usize, 19usize);
    let mut u = Vec::with_capacity(nx * ny);
    let mut v = Vec::with_capacity(nx * ny);
    for row in 0..ny {
        for col in 0..nx {
            u.push(format!("{:.2}", 5.0 + (col % 7) as f32));
            v.push(format!("{:.2}", (row as f32 - 9.0) * 0.5));
        }
    }
    let header = |param: u32| {
        format!(
            r#"{{"lo1":0,"la1":90,"la2":-90,"dx":10,"dy":10,"nx":{},"ny":{},"refTime":"2024-03-01T00:00:00.000Z","parameterNumber":{}}}"#,
            nx, ny, param
        )
    };
    format!(
        r#"[{{"header":{},"data":[{}]}},{{"header":{},"data":[{}]}}]"#,
        header(2),
        u.join(","),
        header(3),
        v.join(",")
    )
}

#[test]
fn perf_smoke_tick() {
    let field = field_from_json(&global_payload()).unwrap();
    assert!(field.wraps_longitude());

    let settings = WindSettings {
        seed: Some(7),
        ..WindSettings::default()
    };
    let mut core = WindCore::with_settings(360, 180, settings).unwrap();
    let bridge = ViewportBridge::new(360, 180, (-180.0, -90.0, 180.0, 90.0), Projection::Equirectangular);
    let mut surface = RasterSurface::new(360, 180);

    core.enable_perf_metrics(true);
    core.replace_field(std::sync::Arc::new(field), &bridge);
    assert_eq!(core.particle_count(), 2520);

    for _ in 0..10 {
        core.tick(&bridge, &mut surface);
    }

    let stats = core.get_perf_stats();
    assert!(stats.tick_ms() >= 0.0);
    assert!(stats.evolve_ms() >= 0.0);
    assert_eq!(stats.particle_count(), 2520);
    assert!(stats.particles_advanced() > 2000);
    assert!(stats.non_empty_buckets() > 1);
    assert_eq!(
        stats.particles_advanced() + stats.particles_reseeded() + stats.particles_retired(),
        2520
    );
    assert!(surface.lit_count() > 0);
}

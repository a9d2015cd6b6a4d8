use cache_shootout::{
    CacheKind, Harness, HarnessConfig, HarnessError, HarnessState, Shape, Threading,
};

fn config(kind: CacheKind) -> HarnessConfig {
    HarnessConfig::builder()
        .kind(kind)
        .domain_bits(14)
        .workers(2)
        .ops_per_invocation(20_000)
        .build()
        .expect("valid config")
}

#[test]
fn single_threaded_shapes_verify_for_every_variant() {
    for kind in CacheKind::ALL {
        let mut harness = Harness::setup(&config(kind)).unwrap();
        for shape in Shape::ALL {
            let m = harness.measure(shape, Threading::Single).unwrap();
            assert_eq!(m.threads, 1, "{kind}/{shape}");
            assert_eq!(m.ops, 20_000);
        }
        let report = harness.teardown().unwrap();
        assert_eq!(report.kind, kind);
        assert_eq!(report.keys_verified, 1 << 14);
        assert_eq!(report.entries, 1 << 14, "{kind}: puts stay inside the domain");
        assert_eq!(report.invocations, 3);
    }
}

#[test]
fn synchronized_variants_verify_after_concurrent_writes() {
    for kind in [
        CacheKind::Lock,
        CacheKind::Concurrent,
        CacheKind::Dash,
        CacheKind::Channel,
        CacheKind::SharedInt,
    ] {
        let mut harness = Harness::setup(&config(kind)).unwrap();
        for _ in 0..3 {
            harness.measure(Shape::Put, Threading::Multi).unwrap();
            harness.measure(Shape::PutGet, Threading::Multi).unwrap();
        }
        let report = harness.teardown().unwrap();
        assert_eq!(report.keys_verified, 1 << 14, "{kind}");
        assert_eq!(report.entries, 1 << 14, "{kind}");
        assert_eq!(report.invocations, 6);
        assert_eq!(report.state, HarnessState::TornDown);
    }
}

#[test]
fn unsynchronized_variants_allow_concurrent_reads_only() {
    for kind in [
        CacheKind::Unshared,
        CacheKind::IntMapSmall,
        CacheKind::IntMapLarge,
    ] {
        let mut harness = Harness::setup(&config(kind)).unwrap();

        let m = harness.measure(Shape::Get, Threading::Multi).unwrap();
        assert_eq!(m.threads, 2);

        for shape in [Shape::Put, Shape::PutGet] {
            match harness.measure(shape, Threading::Multi) {
                Err(HarnessError::ConcurrentWriteUnsupported { kind: k, shape: s }) => {
                    assert_eq!((k, s), (kind, shape));
                }
                other => panic!("{kind}/{shape}: expected refusal, got {other:?}"),
            }
        }

        assert_eq!(harness.state(), HarnessState::Populated);
        assert_eq!(harness.invocations(), 1);
        harness.teardown().unwrap();
    }
}

/// Reads over a fully populated domain return every key exactly, so the
/// checksum is bounded by `ops * mask`.
#[test]
fn get_checksum_stays_within_domain() {
    let mut harness = Harness::setup(&config(CacheKind::IntMapSmall)).unwrap();
    let m = harness.measure(Shape::Get, Threading::Single).unwrap();
    assert!(m.checksum <= 20_000 * u64::from(harness.config().domain_mask()));
    harness.teardown().unwrap();
}

#[test]
fn invalid_config_is_rejected_before_setup() {
    let err = HarnessConfig::builder().domain_mask(1000).build().unwrap_err();
    let err: HarnessError = err.into();
    assert!(err.to_string().contains("domain mask"));
}

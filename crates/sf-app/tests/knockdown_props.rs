//! Property tests: a full knockdown never raises the target's activity.

use std::sync::Arc;

use proptest::prelude::*;
use sf_app::{ScenarioSettings, snapshot};
use sf_network::{KineticParams, NetworkBuilder, NetworkModel, PerturbationSpec, Polarity};

/// `=> N0` followed by a chain where each link activates or inhibits the next
/// node; `inhibit[i]` picks the polarity of the link into `N{i+1}`.
fn cascade(inhibit: &[bool], tau: f64, y0: f64, w: f64, n: f64, ec50: f64) -> NetworkModel {
    let mut b = NetworkBuilder::new();
    let ids: Vec<_> = (0..=inhibit.len()).map(|i| b.add_node(format!("N{i}"))).collect();
    b.add_input(ids[0]);
    for (pair, &inhibits) in ids.windows(2).zip(inhibit) {
        let polarity = if inhibits {
            Polarity::Inhibiting
        } else {
            Polarity::Activating
        };
        b.add_reaction(&[(pair[0], polarity)], pair[1]);
    }
    let topo = Arc::new(b.build().unwrap());
    let params = KineticParams::uniform(&topo, tau, 1.0, y0, w, n, ec50);
    NetworkModel::new(topo, params).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn full_knockdown_never_raises_target(
        inhibit in prop::collection::vec(any::<bool>(), 0..5),
        target in 0usize..6,
        tau in 0.5f64..2.0,
        y0 in 0.0f64..=1.0,
        w in 0.1f64..=1.0,
        n in 1.0f64..3.0,
        ec50 in 0.2f64..0.8,
    ) {
        let model = cascade(&inhibit, tau, y0, w, n, ec50);
        let name = format!("N{}", target % (inhibit.len() + 1));
        let settings = ScenarioSettings::default();
        let kd = PerturbationSpec::knockdown(name.as_str(), 1.0);

        let control = snapshot("control", &model, None, 10.0, 10.0, &settings, None).unwrap();
        let knocked = snapshot("kd", &model, Some(&kd), 10.0, 10.0, &settings, None).unwrap();

        let before = control.get(&name).unwrap();
        let after = knocked.get(&name).unwrap();
        prop_assert!(after.abs() < 1e-9, "{name} = {after} after full knockdown");
        prop_assert!(after <= before + 1e-6, "{name}: {after} > {before}");
    }
}

//! Property tests for perturbation composition.

use std::sync::Arc;

use proptest::prelude::*;
use sf_network::{KineticParams, NetworkBuilder, NetworkModel, Polarity, perturb};

fn chain(len: usize) -> NetworkModel {
    let mut b = NetworkBuilder::new();
    let ids: Vec<_> = (0..len).map(|i| b.add_node(format!("N{i}"))).collect();
    b.add_input(ids[0]);
    for pair in ids.windows(2) {
        b.add_reaction(&[(pair[0], Polarity::Activating)], pair[1]);
    }
    let topo = Arc::new(b.build().unwrap());
    let params = KineticParams::uniform(&topo, 1.0, 1.0, 0.3, 1.0, 1.4, 0.5);
    NetworkModel::new(topo, params).unwrap()
}

proptest! {
    #[test]
    fn combined_is_knockdown_then_stimulus(
        len in 1usize..6,
        fraction in 0.0f64..=1.0,
        level in 0.0f64..2.0,
    ) {
        let base = chain(len);
        let direct = perturb::combined(&base, "N0", fraction, level).unwrap();
        let composed = perturb::stimulus_override(
            &perturb::knockdown(&base, "N0", fraction).unwrap(),
            "N0",
            level,
        )
        .unwrap();
        prop_assert_eq!(direct.params(), composed.params());
    }

    #[test]
    fn knockdown_never_touches_other_nodes(
        len in 2usize..6,
        target in 0usize..6,
        fraction in 0.0f64..=1.0,
    ) {
        let base = chain(len);
        let target = target % len;
        let kd = perturb::knockdown(&base, &format!("N{target}"), fraction).unwrap();
        for i in (0..len).filter(|&i| i != target) {
            prop_assert_eq!(kd.ymax()[i], base.ymax()[i]);
            prop_assert_eq!(kd.y0()[i], base.y0()[i]);
        }
        prop_assert!(kd.ymax()[target] <= base.ymax()[target]);
    }
}

//! Property tests: activation stays bounded and finite.

use std::sync::Arc;

use proptest::prelude::*;
use sf_kinetics::{HillCurve, HillForm, KineticsOptions, LogicKind, VectorField};
use sf_network::{KineticParams, NetworkBuilder, NetworkModel, Polarity};

/// `=> S`, `S => A`, `!A & S => B`, `A => B`.
fn model(w: [f64; 4], n: f64, ec50: f64) -> NetworkModel {
    let mut b = NetworkBuilder::new();
    let s = b.add_node("S");
    let a = b.add_node("A");
    let nb = b.add_node("B");
    b.add_input(s);
    b.add_reaction(&[(s, Polarity::Activating)], a);
    b.add_reaction(&[(a, Polarity::Inhibiting), (s, Polarity::Activating)], nb);
    b.add_reaction(&[(a, Polarity::Activating)], nb);
    let topo = Arc::new(b.build().unwrap());
    let mut params = KineticParams::uniform(&topo, 1.0, 1.0, 0.0, 1.0, n, ec50);
    params.w = w.to_vec();
    // Input drives are non-negative.
    params.w[0] = w[0].abs();
    NetworkModel::new(topo, params).unwrap()
}

fn logic() -> impl Strategy<Value = LogicKind> {
    prop_oneof![Just(LogicKind::Netflux), Just(LogicKind::MinMax)]
}

fn hill() -> impl Strategy<Value = HillForm> {
    prop_oneof![Just(HillForm::Normalized), Just(HillForm::Standard)]
}

proptest! {
    #[test]
    fn hill_in_unit_interval(n in 0.5_f64..6.0, ec50 in 0.05_f64..0.95, x in 0.0_f64..=1.0, form in hill()) {
        let v = HillCurve::new(form, n, ec50).eval(x);
        prop_assert!((0.0..=1.0 + 1e-12).contains(&v), "f({x}) = {v}");
    }

    #[test]
    fn activation_bounded_for_unit_inputs(
        w in prop::array::uniform4(-1.0_f64..=1.0),
        n in 0.5_f64..5.0,
        ec50 in 0.05_f64..0.95,
        y in prop::array::uniform3(0.0_f64..=1.0),
        logic in logic(),
        hill in hill(),
    ) {
        let field = VectorField::new(&model(w, n, ec50), KineticsOptions { hill, logic });
        let mut act = [0.0; 3];
        field.activation(&y, &mut act);
        for a in act {
            prop_assert!((-1e-12..=1.0 + 1e-12).contains(&a), "act = {a}");
        }
    }

    #[test]
    fn derivative_finite_anywhere(
        y in prop::array::uniform3(-10.0_f64..10.0),
        n in 0.5_f64..5.0,
        ec50 in 0.05_f64..0.95,
    ) {
        let field = VectorField::new(&model([1.0, 0.8, 0.6, -0.4], n, ec50), KineticsOptions::default());
        let mut dy = [0.0; 3];
        field.derivative(&y, &mut dy);
        prop_assert!(dy.iter().all(|v| v.is_finite()));
    }
}

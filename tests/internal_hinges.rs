//! Internal hinges under analysis: moment releases, compound (Gerber)
//! beams and degenerate releases.

use approx::assert_relative_eq;
use flex_solver::prelude::*;

fn steel_model(name: &str) -> Model {
    let mut model = Model::new(name);
    model.add_material(Material::steel()).unwrap();
    model.add_section(Section::ipe_220()).unwrap();
    model
}

#[test]
fn hinged_prop_end_is_isostatic_and_releases_the_moment() {
    // Fixed at A, vertical roller at B, hinge at the B end of the bar:
    // GH = 4 + 3 - 6 - 1 = 0. The hinge releases a moment that is
    // already free at the roller, so the equilibrium system is
    // rank-deficient; the analysis still succeeds on least-squares
    // reactions with the release honoured.
    let mut model = steel_model("hinged prop");
    model
        .add_node(Node::new(1, 0.0, 0.0).with_support(Support::fixed()))
        .unwrap();
    model
        .add_node(Node::new(2, 6.0, 0.0).with_support(Support::roller_y()))
        .unwrap();
    model
        .add_bar(Bar::new(1, 1, 2, "Steel A-36", "IPE 220").with_hinge_j())
        .unwrap();
    model.add_load(BarPointLoad::perpendicular(1, 10.0, 3.0)).unwrap();

    assert_eq!(model.degree_of_indeterminacy(), 0);
    let result = analyze(&model, &AnalysisOptions::default());
    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.degree, 0);
    assert!(result
        .warnings
        .iter()
        .any(|w| w.contains("rank-deficient")));

    // Zero moment at the hinge, vertical equilibrium intact
    assert_relative_eq!(result.m(1, 6.0), 0.0, epsilon = 1e-8);
    let sum: f64 = result.reaction(1)[1] + result.reaction(2)[1];
    assert_relative_eq!(sum, -10.0, epsilon = 1e-8);
    // Minimum-norm reactions split the load evenly with no clamp moment
    assert_relative_eq!(result.reaction(1)[1], -5.0, epsilon = 1e-8);
    assert_relative_eq!(result.reaction(2)[1], -5.0, epsilon = 1e-8);
    assert_relative_eq!(result.reaction(1)[2], 0.0, epsilon = 1e-8);
}

#[test]
fn gerber_compound_beam_solves_by_the_hinge_condition() {
    // Cantilever A-C carrying a suspended span C-B through a hinge at C:
    // GH = 4 + 6 - 9 - 1 = 0, a classic compound beam. The span behaves
    // as simply supported on the hinge and the roller; the cantilever
    // picks up the hinge force.
    let mut model = steel_model("gerber beam");
    model
        .add_node(Node::new(1, 0.0, 0.0).with_support(Support::fixed()))
        .unwrap();
    model
        .add_node(Node::new(2, 12.0, 0.0).with_support(Support::roller_y()))
        .unwrap();
    model.add_node(Node::new(3, 6.0, 0.0)).unwrap();
    model
        .add_bar(Bar::new(1, 1, 3, "Steel A-36", "IPE 220"))
        .unwrap();
    model
        .add_bar(Bar::new(2, 3, 2, "Steel A-36", "IPE 220").with_hinge_i())
        .unwrap();
    // 10 kN at the middle of the suspended span (x = 9 globally)
    model.add_load(BarPointLoad::perpendicular(2, 10.0, 3.0)).unwrap();

    assert_eq!(model.degree_of_indeterminacy(), 0);
    let result = analyze(&model, &AnalysisOptions::default());
    assert!(result.success, "errors: {:?}", result.errors);
    assert!(!result.warnings.iter().any(|w| w.contains("rank-deficient")));

    // Suspended span: half the load to the roller, half through the hinge
    assert_relative_eq!(result.reaction(2)[1], -5.0, epsilon = 1e-8);
    assert_relative_eq!(result.reaction(1)[1], -5.0, epsilon = 1e-8);
    // Cantilever clamp carries the hinge force at 6 m
    assert_relative_eq!(result.reaction(1)[2], -30.0, epsilon = 1e-8);

    // Moment is released at the hinge and peaks under the load
    assert_relative_eq!(result.m(1, 0.0), -30.0, epsilon = 1e-8);
    assert_relative_eq!(result.m(1, 6.0), 0.0, epsilon = 1e-8);
    assert_relative_eq!(result.m(2, 0.0), 0.0, epsilon = 1e-8);
    assert_relative_eq!(result.m(2, 3.0), 15.0, epsilon = 1e-8);
    assert_relative_eq!(result.m(2, 6.0), 0.0, epsilon = 1e-8);
}

#[test]
fn hinge_at_a_clamped_end_reduces_it_to_a_pin() {
    // Fixed at both ends with a hinge at the B end: the rotational
    // restraint at B cannot develop a reaction, so the beam responds as
    // fixed-pinned (the propped cantilever solution).
    let mut model = steel_model("clamped-hinged");
    model
        .add_node(Node::new(1, 0.0, 0.0).with_support(Support::fixed()))
        .unwrap();
    model
        .add_node(Node::new(2, 6.0, 0.0).with_support(Support::fixed()))
        .unwrap();
    model
        .add_bar(Bar::new(1, 1, 2, "Steel A-36", "IPE 220").with_hinge_j())
        .unwrap();
    model.add_load(BarPointLoad::perpendicular(1, 10.0, 3.0)).unwrap();

    assert_eq!(model.degree_of_indeterminacy(), 2);
    let result = analyze(&model, &AnalysisOptions::default());
    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.degree, 2);

    // 3PL/16 at the clamp, zero at the hinge
    assert_relative_eq!(result.m(1, 0.0), -11.25, epsilon = 1e-8);
    assert_relative_eq!(result.m(1, 6.0), 0.0, epsilon = 1e-8);
    assert_relative_eq!(result.reaction(1)[1], -6.875, epsilon = 1e-8);
    assert_relative_eq!(result.reaction(2)[1], -3.125, epsilon = 1e-8);
    assert_relative_eq!(result.reaction(1)[2], -11.25, epsilon = 1e-8);
    // The hinged clamp never develops a moment reaction
    assert_relative_eq!(result.reaction(2)[2], 0.0, epsilon = 1e-10);
}

#[test]
fn hinge_at_a_fixed_support_behaves_as_a_simple_support() {
    // Fixed at A with the bar hinged off it, pinned at B: the structure
    // responds as a simply supported beam.
    let mut model = steel_model("hinged clamp");
    model
        .add_node(Node::new(1, 0.0, 0.0).with_support(Support::fixed()))
        .unwrap();
    model
        .add_node(Node::new(2, 6.0, 0.0).with_support(Support::pinned()))
        .unwrap();
    model
        .add_bar(Bar::new(1, 1, 2, "Steel A-36", "IPE 220").with_hinge_i())
        .unwrap();
    model.add_load(BarPointLoad::perpendicular(1, 10.0, 3.0)).unwrap();

    assert_eq!(model.degree_of_indeterminacy(), 1);
    let result = analyze(&model, &AnalysisOptions::default());
    assert!(result.success, "errors: {:?}", result.errors);

    assert_relative_eq!(result.m(1, 0.0), 0.0, epsilon = 1e-8);
    assert_relative_eq!(result.m(1, 3.0), 15.0, epsilon = 1e-8);
    assert_relative_eq!(result.reaction(1)[1], -5.0, epsilon = 1e-8);
    assert_relative_eq!(result.reaction(2)[1], -5.0, epsilon = 1e-8);
    assert_relative_eq!(result.reaction(1)[2], 0.0, epsilon = 1e-10);
}

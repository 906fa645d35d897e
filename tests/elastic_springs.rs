//! Elastic spring supports: kept-spring flexibility, released-spring
//! redundants and the rigid limit.

use approx::assert_relative_eq;
use flex_solver::prelude::*;

const EI: f64 = 200e6 * 2772e-8; // 5544 kNm²

/// Fixed-fixed 6 m beam split at mid-span, middle node on a vertical
/// spring, uniform load on both halves.
fn spring_supported_beam(ky: f64) -> Model {
    let mut model = Model::new("beam on spring");
    model.add_material(Material::steel()).unwrap();
    model.add_section(Section::ipe_220()).unwrap();
    model
        .add_node(Node::new(1, 0.0, 0.0).with_support(Support::fixed()))
        .unwrap();
    model
        .add_node(Node::new(2, 6.0, 0.0).with_support(Support::fixed()))
        .unwrap();
    model
        .add_node(Node::new(3, 3.0, 0.0).with_support(Support::spring(0.0, ky, 0.0)))
        .unwrap();
    model
        .add_bar(Bar::new(1, 1, 3, "Steel A-36", "IPE 220"))
        .unwrap();
    model
        .add_bar(Bar::new(2, 3, 2, "Steel A-36", "IPE 220"))
        .unwrap();
    model
        .add_load(BarDistributedLoad::uniform(1, 4.0, 0.0, 3.0))
        .unwrap();
    model
        .add_load(BarDistributedLoad::uniform(2, 4.0, 0.0, 3.0))
        .unwrap();
    model
}

/// Same beam with a rigid middle support.
fn rigid_supported_beam() -> Model {
    let mut model = spring_supported_beam(1.0);
    model.set_support(3, Support::roller_y()).unwrap();
    model
}

#[test]
fn spring_counts_as_a_restraint_for_indeterminacy() {
    let model = spring_supported_beam(1000.0);
    // r = 3 + 3 + 1, b = 2, n = 3: GH = 7 + 6 - 9 = 4
    assert_eq!(model.degree_of_indeterminacy(), 4);
}

#[test]
fn stiff_spring_approaches_the_rigid_middle_support() {
    let rigid = analyze(&rigid_supported_beam(), &AnalysisOptions::default());
    assert!(rigid.success, "errors: {:?}", rigid.errors);

    let stiff = analyze(&spring_supported_beam(1e9), &AnalysisOptions::default());
    assert!(stiff.success, "errors: {:?}", stiff.errors);

    // Middle reaction and the moment over it converge to the rigid case
    assert_relative_eq!(
        stiff.reaction(3)[1],
        rigid.reaction(3)[1],
        max_relative = 1e-4
    );
    assert_relative_eq!(stiff.m(1, 3.0), rigid.m(1, 3.0), max_relative = 1e-3);
}

#[test]
fn soft_spring_carries_less_than_stiff_spring() {
    let soft = analyze(&spring_supported_beam(1e3), &AnalysisOptions::default());
    let stiff = analyze(&spring_supported_beam(1e9), &AnalysisOptions::default());
    assert!(soft.success && stiff.success);

    assert!(
        soft.reaction(3)[1].abs() < stiff.reaction(3)[1].abs(),
        "a softer spring must attract less load"
    );

    // Total vertical equilibrium holds in both cases (24 kN applied)
    for result in [&soft, &stiff] {
        let sum: f64 = [1u32, 2, 3].iter().map(|&n| result.reaction(n)[1]).sum();
        assert_relative_eq!(sum, -24.0, epsilon = 1e-7);
    }
}

#[test]
fn released_spring_reports_reaction_and_displacement() {
    // Cantilever propped by a vertical spring at the tip, P = 10 kN at
    // mid-span. Releasing the spring as the redundant adds 1/k to f11:
    // X = -e0 / (L³/3EI + 1/k), and the tip moves by -X/k.
    let mut model = Model::new("spring-propped cantilever");
    model.add_material(Material::steel()).unwrap();
    model.add_section(Section::ipe_220()).unwrap();
    model
        .add_node(Node::new(1, 0.0, 0.0).with_support(Support::fixed()))
        .unwrap();
    let k = 1000.0;
    model
        .add_node(Node::new(2, 6.0, 0.0).with_support(Support::spring(0.0, k, 0.0)))
        .unwrap();
    model
        .add_bar(Bar::new(1, 1, 2, "Steel A-36", "IPE 220"))
        .unwrap();
    model.add_load(BarPointLoad::perpendicular(1, 10.0, 3.0)).unwrap();

    let result = analyze(
        &model,
        &AnalysisOptions::default().with_redundants(vec![Redundant::reaction_y(2)]),
    );
    assert!(result.success, "errors: {:?}", result.errors);

    // Hand-assembled coefficients: f11 = 72/EI + 1/k, e0 = 225/EI
    let x_expected = -225.0 / (72.0 + EI / k);
    assert_relative_eq!(result.x_value(1).unwrap(), x_expected, epsilon = 1e-8);
    assert_relative_eq!(result.reaction(2)[1], x_expected, epsilon = 1e-8);

    // Spring displacement u = -X/k, downward under the hanging load
    let u = result.spring_displacements[&2][1];
    assert_relative_eq!(u, -x_expected / k, epsilon = 1e-10);
    assert!(u > 0.0, "tip must deflect downward");

    // Rigid limit cross-check: with k -> inf the classic 5P/16 prop returns
    let mut rigid_model = model.clone();
    rigid_model.set_support(2, Support::roller_y()).unwrap();
    let rigid = analyze(
        &rigid_model,
        &AnalysisOptions::default().with_redundants(vec![Redundant::reaction_y(2)]),
    );
    assert_relative_eq!(rigid.x_value(1).unwrap(), -3.125, epsilon = 1e-8);
    assert!(result.reaction(2)[1].abs() < rigid.reaction(2)[1].abs());
}

#[test]
fn kept_spring_softens_the_structure() {
    // With the heuristic keeping the spring, its flexibility flows in
    // through e0: the softer the spring, the more moment migrates to the
    // clamped ends.
    let soft = analyze(&spring_supported_beam(1e3), &AnalysisOptions::default());
    let stiff = analyze(&spring_supported_beam(1e9), &AnalysisOptions::default());
    assert!(soft.success && stiff.success);

    let m_end_soft = soft.m(1, 0.0).abs();
    let m_end_stiff = stiff.m(1, 0.0).abs();
    assert!(
        m_end_soft > m_end_stiff,
        "softer middle support must shed moment to the ends \
         (soft {m_end_soft}, stiff {m_end_stiff})"
    );
}

//! Continuous beams, support movements and a rigid frame.

use approx::assert_relative_eq;
use flex_solver::prelude::*;

const EI: f64 = 200e6 * 2772e-8; // 5544 kNm²

fn two_span_beam() -> Model {
    let mut model = Model::new("two-span beam");
    model.add_material(Material::steel()).unwrap();
    model.add_section(Section::ipe_220()).unwrap();
    model
        .add_node(Node::new(1, 0.0, 0.0).with_support(Support::pinned()))
        .unwrap();
    model
        .add_node(Node::new(2, 6.0, 0.0).with_support(Support::roller_y()))
        .unwrap();
    model
        .add_node(Node::new(3, 12.0, 0.0).with_support(Support::roller_y()))
        .unwrap();
    model
        .add_bar(Bar::new(1, 1, 2, "Steel A-36", "IPE 220"))
        .unwrap();
    model
        .add_bar(Bar::new(2, 2, 3, "Steel A-36", "IPE 220"))
        .unwrap();
    model
}

#[test]
fn continuous_beam_under_uniform_load() {
    // Two equal 6 m spans, q = 4 kN/m everywhere. Classic solution:
    // M over the middle support = -qL²/8, end reactions 3qL/8, middle
    // reaction 10qL/8.
    let mut model = two_span_beam();
    model
        .add_load(BarDistributedLoad::uniform(1, 4.0, 0.0, 6.0))
        .unwrap();
    model
        .add_load(BarDistributedLoad::uniform(2, 4.0, 0.0, 6.0))
        .unwrap();

    let result = analyze(&model, &AnalysisOptions::default());
    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.degree, 1);

    let q = 4.0;
    let l = 6.0;
    assert_relative_eq!(result.m(1, 6.0), -q * l * l / 8.0, epsilon = 1e-7);
    // Moment is continuous across the middle support
    assert_relative_eq!(result.m(2, 0.0), result.m(1, 6.0), epsilon = 1e-8);
    // Span ends carry no moment
    assert_relative_eq!(result.m(1, 0.0), 0.0, epsilon = 1e-7);
    assert_relative_eq!(result.m(2, 6.0), 0.0, epsilon = 1e-7);

    assert_relative_eq!(result.reaction(1)[1], -3.0 * q * l / 8.0, epsilon = 1e-7);
    assert_relative_eq!(result.reaction(3)[1], -3.0 * q * l / 8.0, epsilon = 1e-7);
    assert_relative_eq!(result.reaction(2)[1], -10.0 * q * l / 8.0, epsilon = 1e-7);
}

#[test]
fn middle_support_settlement_follows_the_three_moment_relation() {
    // No loads, the middle support settles 10 mm (downward, +Y). The
    // movement sits at a non-redundant support and enters e0 as Rⁱ·δ;
    // the moment over the settled support then has the three-moment
    // magnitude 3EIδ/L² and the reactions form a self-equilibrated set
    // of magnitude 6EIδ/L³ at the middle.
    let mut model = two_span_beam();
    let delta = 0.01;
    model
        .add_load(PrescribedMovement::settlement(2, delta))
        .unwrap();

    let result = analyze(&model, &AnalysisOptions::default());
    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.degree, 1);

    let l = 6.0;
    let m_expected = -3.0 * EI * delta / (l * l);
    assert_relative_eq!(result.m(1, 6.0), m_expected, epsilon = 1e-7);
    assert_relative_eq!(result.m(2, 0.0), m_expected, epsilon = 1e-7);

    // Linear moment variation along each span (no transverse load)
    assert_relative_eq!(result.m(1, 3.0), m_expected / 2.0, epsilon = 1e-7);
    assert_relative_eq!(result.m(1, 0.0), 0.0, epsilon = 1e-7);

    let r_mid = -6.0 * EI * delta / (l * l * l);
    assert_relative_eq!(result.reaction(2)[1], r_mid, epsilon = 1e-7);
    assert_relative_eq!(result.reaction(1)[1], -r_mid / 2.0, epsilon = 1e-7);
    assert_relative_eq!(result.reaction(3)[1], -r_mid / 2.0, epsilon = 1e-7);

    // Self-equilibrated reaction set
    let sum: f64 = [1u32, 2, 3].iter().map(|&n| result.reaction(n)[1]).sum();
    assert_relative_eq!(sum, 0.0, epsilon = 1e-10);

    // The sign-consistency question of imposed movements is surfaced
    assert!(result.warnings.iter().any(|w| w.contains("Rⁱ·δ")));
}

#[test]
fn settlement_at_the_redundant_node_enters_the_right_hand_side() {
    // Propped cantilever whose prop settles: choosing the prop reaction
    // as the manual redundant routes the movement through e_h, and the
    // prop force becomes X = 3EIδ/L³ downward on the beam.
    let mut model = Model::new("settling prop");
    model.add_material(Material::steel()).unwrap();
    model.add_section(Section::ipe_220()).unwrap();
    model
        .add_node(Node::new(1, 0.0, 0.0).with_support(Support::fixed()))
        .unwrap();
    model
        .add_node(Node::new(2, 6.0, 0.0).with_support(Support::roller_y()))
        .unwrap();
    model
        .add_bar(Bar::new(1, 1, 2, "Steel A-36", "IPE 220"))
        .unwrap();
    let delta = 0.01;
    model
        .add_load(PrescribedMovement::settlement(2, delta))
        .unwrap();

    let result = analyze(
        &model,
        &AnalysisOptions::default().with_redundants(vec![Redundant::reaction_y(2)]),
    );
    assert!(result.success, "errors: {:?}", result.errors);

    let l: f64 = 6.0;
    let x_expected = 3.0 * EI * delta / l.powi(3);
    assert_relative_eq!(result.x_value(1).unwrap(), x_expected, epsilon = 1e-9);
    assert_relative_eq!(result.reaction(2)[1], x_expected, epsilon = 1e-9);
    // The fixed end picks up the opposite shear; the tip dragged down
    // hogs the root
    assert_relative_eq!(result.reaction(1)[1], -x_expected, epsilon = 1e-9);
    assert_relative_eq!(result.m(1, 0.0), -x_expected * l, epsilon = 1e-8);
}

#[test]
fn portal_frame_under_lateral_load() {
    // Π-frame, 6 m span, 3 m columns, bases fixed (Y grows downward so
    // the bases sit at y = 3), 5 kN pushing at the top-left corner.
    let mut model = Model::new("portal frame");
    model.add_material(Material::steel()).unwrap();
    model.add_section(Section::ipe_220()).unwrap();
    model.add_node(Node::new(1, 0.0, 0.0)).unwrap();
    model.add_node(Node::new(2, 6.0, 0.0)).unwrap();
    model
        .add_node(Node::new(3, 0.0, 3.0).with_support(Support::fixed()))
        .unwrap();
    model
        .add_node(Node::new(4, 6.0, 3.0).with_support(Support::fixed()))
        .unwrap();
    model
        .add_bar(Bar::new(1, 1, 3, "Steel A-36", "IPE 220"))
        .unwrap();
    model
        .add_bar(Bar::new(2, 2, 4, "Steel A-36", "IPE 220"))
        .unwrap();
    model
        .add_bar(Bar::new(3, 1, 2, "Steel A-36", "IPE 220"))
        .unwrap();
    model.add_load(NodalLoad::fx(1, 5.0)).unwrap();

    let result = analyze(&model, &AnalysisOptions::default());
    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.degree, 3);

    // Global horizontal equilibrium
    let rx: f64 = result.reaction(3)[0] + result.reaction(4)[0];
    assert_relative_eq!(rx, -5.0, epsilon = 1e-8);
    // Vertical reactions form an overturning couple
    let ry: f64 = result.reaction(3)[1] + result.reaction(4)[1];
    assert_relative_eq!(ry, 0.0, epsilon = 1e-8);

    // Sway response: column base moments match in magnitude
    let m_base_left = result.m(1, 3.0);
    let m_base_right = result.m(2, 3.0);
    assert_relative_eq!(m_base_left.abs(), m_base_right.abs(), epsilon = 1e-6);
    assert!(m_base_left.abs() > 1e-3, "columns must carry moment");

    // Maxwell-Betti symmetry of the assembled flexibility matrix
    let f = result.f_matrix.as_ref().unwrap();
    let mut max_asym = 0.0f64;
    let mut max_entry = 0.0f64;
    for i in 0..f.nrows() {
        for j in 0..f.ncols() {
            max_asym = max_asym.max((f[(i, j)] - f[(j, i)]).abs());
            max_entry = max_entry.max(f[(i, j)].abs());
        }
    }
    assert!(max_asym <= 1e-12 * max_entry.max(1.0));

    assert!(result.sece_residual < 1e-8);
}

#[test]
fn inclined_prop_carries_axial_force() {
    // A horizontal cantilever propped by an inclined strut: the strut
    // diagrams come from solving the released structure, so its axial
    // force reflects the true geometry.
    let mut model = Model::new("strut-propped beam");
    model.add_material(Material::steel()).unwrap();
    model.add_section(Section::ipe_220()).unwrap();
    model
        .add_node(Node::new(1, 0.0, 0.0).with_support(Support::fixed()))
        .unwrap();
    model.add_node(Node::new(2, 4.0, 0.0)).unwrap();
    model
        .add_node(Node::new(3, 4.0, 3.0).with_support(Support::pinned()))
        .unwrap();
    model
        .add_bar(Bar::new(1, 1, 2, "Steel A-36", "IPE 220"))
        .unwrap();
    model
        .add_bar(Bar::new(2, 2, 3, "Steel A-36", "IPE 220"))
        .unwrap();
    model.add_load(BarPointLoad::perpendicular(1, 10.0, 2.0)).unwrap();

    let result = analyze(&model, &AnalysisOptions::default());
    assert!(result.success, "errors: {:?}", result.errors);
    // GH = (3 + 2) + 6 - 9 = 2
    assert_eq!(result.degree, 2);

    // Global equilibrium of the reaction set
    let mut fx = 0.0;
    let mut fy = 10.0;
    for node in [1u32, 3] {
        fx += result.reaction(node)[0];
        fy += result.reaction(node)[1];
    }
    assert_relative_eq!(fx, 0.0, epsilon = 1e-8);
    assert_relative_eq!(fy, 0.0, epsilon = 1e-8);

    // The vertical strut sees the vertical reaction at node 3 as axial
    // force (tension positive, node 3 below pulls down on it).
    let n_strut = result.n(2, 1.5);
    assert!(n_strut.abs() > 1e-6, "strut must carry axial force");
}

//! flex-solver example - rigid portal frame under a lateral load.

use anyhow::Result;
use flex_solver::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== flex-solver example: portal frame ===\n");

    let mut model = Model::new("Portal frame");

    model.add_material(Material::steel())?;
    model.add_section(Section::ipe_220())?;

    // Y grows downward, so the fixed bases sit at y = 3.
    //
    //     N1 -------- N2      <- beam at y = 0
    //     |           |
    //     |           |
    //     N3         N4       <- fixed bases at y = 3
    //
    let height = 3.0;
    let span = 6.0;

    model.add_node(Node::new(1, 0.0, 0.0).with_name("top left"))?;
    model.add_node(Node::new(2, span, 0.0).with_name("top right"))?;
    model.add_node(
        Node::new(3, 0.0, height)
            .with_name("base left")
            .with_support(Support::fixed()),
    )?;
    model.add_node(
        Node::new(4, span, height)
            .with_name("base right")
            .with_support(Support::fixed()),
    )?;

    model.add_bar(Bar::new(1, 1, 3, "Steel A-36", "IPE 220"))?;
    model.add_bar(Bar::new(2, 2, 4, "Steel A-36", "IPE 220"))?;
    model.add_bar(Bar::new(3, 1, 2, "Steel A-36", "IPE 220"))?;

    // 5 kN pushing the frame sideways at the top-left corner
    model.add_load(NodalLoad::fx(1, 5.0))?;

    println!("degree of indeterminacy: {}", model.degree_of_indeterminacy());

    let result = analyze(&model, &AnalysisOptions::default());

    if !result.success {
        for error in &result.errors {
            eprintln!("error: {error}");
        }
        anyhow::bail!("analysis failed");
    }

    println!("\nredundants:");
    for redundant in &result.redundants {
        println!(
            "  {} = {:.4}  ({})",
            redundant.short_name(),
            result.x_value(redundant.index).unwrap_or(0.0),
            redundant.description
        );
    }

    println!("\nreactions (Rx, Ry, Mz):");
    for node in [3u32, 4] {
        let r = result.reaction(node);
        println!("  node {node}: {:10.4} {:10.4} {:10.4}", r[0], r[1], r[2]);
    }

    println!("\ncolumn moments:");
    for bar in [1u32, 2] {
        let d = result.diagram(bar).expect("diagram");
        println!(
            "  bar {bar}: M(top) = {:8.4}  M(base) = {:8.4}",
            d.m(0.0),
            d.m(d.length)
        );
    }

    println!("\ncondition number: {:.3e}", result.condition_number);
    println!("SECE residual:    {:.3e}", result.sece_residual);
    for warning in &result.warnings {
        println!("warning: {warning}");
    }

    Ok(())
}

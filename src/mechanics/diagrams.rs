//! Internal-force diagrams and the section-method builder.
//!
//! Diagrams are piecewise cubic polynomials in the bar abscissa with break
//! points at load positions, so superposition and end-value queries are
//! exact. The section method sums everything acting on the i-side of the
//! cut: a seed resultant carrying the rest of the structure (reactions,
//! nodal actions and loads of the i-side free body reduced to the i end)
//! plus the bar's own loads up to the cut.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::elements::BarProps;
use crate::loads::{BarDistributedLoad, BarPointLoad};
use crate::math::Poly;

/// One smooth stretch of a diagram, `x0 ≤ x ≤ x1`, with N, V and M as
/// polynomials in the absolute bar abscissa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub x0: f64,
    pub x1: f64,
    pub n: Poly,
    pub v: Poly,
    pub m: Poly,
}

/// Complete N/V/M diagram of one bar, callable on `[0, L]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagram {
    pub bar: u32,
    pub length: f64,
    pub segments: Vec<Segment>,
}

/// Resultant of the i-side free body, reduced to the bar's i end:
/// global force components plus the couple about that point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SectionSeed {
    pub fx: f64,
    pub fy: f64,
    pub m: f64,
}

impl Diagram {
    /// An identically zero diagram.
    pub fn zero(bar: u32, length: f64) -> Self {
        Self {
            bar,
            length,
            segments: vec![Segment {
                x0: 0.0,
                x1: length,
                n: Poly::zero(),
                v: Poly::zero(),
                m: Poly::zero(),
            }],
        }
    }

    /// A linear bending diagram from `mi` at x = 0 to `mj` at x = L with
    /// zero axial and shear, the shape of a released unit moment.
    pub fn linear_moment(bar: u32, length: f64, mi: f64, mj: f64) -> Self {
        Self {
            bar,
            length,
            segments: vec![Segment {
                x0: 0.0,
                x1: length,
                n: Poly::zero(),
                v: Poly::zero(),
                m: Poly::line_through(0.0, mi, length, mj),
            }],
        }
    }

    /// A constant axial diagram with zero shear and bending.
    pub fn constant_axial(bar: u32, length: f64, n: f64) -> Self {
        Self {
            bar,
            length,
            segments: vec![Segment {
                x0: 0.0,
                x1: length,
                n: Poly::constant(n),
                v: Poly::zero(),
                m: Poly::zero(),
            }],
        }
    }

    fn segment_at(&self, x: f64) -> &Segment {
        let x = x.clamp(0.0, self.length);
        self.segments
            .iter()
            .find(|s| x <= s.x1 + 1e-12)
            .unwrap_or_else(|| self.segments.last().expect("diagram has segments"))
    }

    /// Axial force at `x`, positive in tension.
    pub fn n(&self, x: f64) -> f64 {
        self.segment_at(x).n.eval(x.clamp(0.0, self.length))
    }

    /// Shear force at `x`.
    pub fn v(&self, x: f64) -> f64 {
        self.segment_at(x).v.eval(x.clamp(0.0, self.length))
    }

    /// Bending moment at `x`, positive when the bottom fibre is in tension.
    pub fn m(&self, x: f64) -> f64 {
        self.segment_at(x).m.eval(x.clamp(0.0, self.length))
    }

    /// Bending moment end values `(M(0), M(L))`.
    pub fn m_ends(&self) -> (f64, f64) {
        (self.m(0.0), self.m(self.length))
    }

    /// True when the bending diagram is one linear stretch, the shape the
    /// Mohr trapezoid row integrates exactly.
    pub fn is_single_linear_m(&self) -> bool {
        self.segments.len() == 1 && self.segments[0].m.is_linear()
    }

    /// Sample the diagram at `n` evenly spaced stations, as
    /// `[x, N, V, M]` rows. This is all a presenter needs for plotting.
    pub fn sample(&self, n: usize) -> Vec<[f64; 4]> {
        let n = n.max(2);
        (0..n)
            .map(|i| {
                let x = self.length * i as f64 / (n - 1) as f64;
                [x, self.n(x), self.v(x), self.m(x)]
            })
            .collect()
    }

    /// Exact polynomial superposition `base + Σ factorᵢ·termᵢ`. Terms may
    /// be absent (a substructure that leaves the bar unloaded).
    pub fn superpose(base: &Diagram, terms: &[(f64, Option<&Diagram>)]) -> Diagram {
        let mut breaks: Vec<f64> = Vec::new();
        let mut push_breaks = |d: &Diagram| {
            for s in &d.segments {
                breaks.push(s.x0);
                breaks.push(s.x1);
            }
        };
        push_breaks(base);
        for (_, term) in terms {
            if let Some(d) = term {
                push_breaks(d);
            }
        }
        breaks.sort_by(|a, b| a.partial_cmp(b).expect("finite break points"));
        breaks.dedup_by(|a, b| (*a - *b).abs() < 1e-12);

        let mut segments = Vec::with_capacity(breaks.len().saturating_sub(1));
        for pair in breaks.windows(2) {
            let (x0, x1) = (pair[0], pair[1]);
            if x1 - x0 < 1e-12 {
                continue;
            }
            let mid = (x0 + x1) / 2.0;
            let base_seg = base.segment_at(mid);
            let mut n = base_seg.n;
            let mut v = base_seg.v;
            let mut m = base_seg.m;
            for (factor, term) in terms {
                if let Some(d) = term {
                    let seg = d.segment_at(mid);
                    n.axpy(*factor, &seg.n);
                    v.axpy(*factor, &seg.v);
                    m.axpy(*factor, &seg.m);
                }
            }
            segments.push(Segment { x0, x1, n, v, m });
        }

        Diagram {
            bar: base.bar,
            length: base.length,
            segments,
        }
    }
}

/// Diagrams per bar id, the payload of a substructure or of the final
/// superposed state.
pub type DiagramSet = HashMap<u32, Diagram>;

/// Build the N/V/M diagram of a bar by the section method.
///
/// `seed` is the i-side free-body resultant reduced to the i end;
/// `points` and `dists` are the loads acting on the bar itself, with
/// positions already validated against the bar length.
pub fn build_section_diagram(
    props: &BarProps,
    seed: SectionSeed,
    points: &[BarPointLoad],
    dists: &[BarDistributedLoad],
) -> Diagram {
    let length = props.length;
    let (c, s) = (props.cos, props.sin);

    let mut breaks = vec![0.0, length];
    for p in points {
        if p.a > 1e-12 && p.a < length - 1e-12 {
            breaks.push(p.a);
        }
    }
    for q in dists {
        for x in [q.x1, q.x2] {
            if x > 1e-12 && x < length - 1e-12 {
                breaks.push(x);
            }
        }
    }
    breaks.sort_by(|a, b| a.partial_cmp(b).expect("finite break points"));
    breaks.dedup_by(|a, b| (*a - *b).abs() < 1e-12);

    let mut segments = Vec::with_capacity(breaks.len() - 1);
    for pair in breaks.windows(2) {
        let (x0, x1) = (pair[0], pair[1]);

        // Running sums of the left-side forces as polynomials in x.
        let mut sum_fx = Poly::constant(seed.fx);
        let mut sum_fy = Poly::constant(seed.fy);
        // Seed couple transferred from the i end to the cut point.
        let mut m = Poly::linear(seed.m, -seed.fy * c + seed.fx * s);

        for p in points {
            if p.a <= x0 + 1e-12 {
                let (pfx, pfy) = p.global_components(props.angle);
                sum_fx = sum_fx.add(&Poly::constant(pfx));
                sum_fy = sum_fy.add(&Poly::constant(pfy));
                // Only the perpendicular component has a lever arm along
                // the bar axis: dM = -P·sinφ·(x - a)
                let p_perp = p.p * p.phi_deg.to_radians().sin();
                m = m.add(&Poly::linear(p_perp * p.a, -p_perp));
            }
        }

        for q in dists {
            if q.x2 <= x0 + 1e-12 {
                // Fully to the left: reduce to its resultant.
                let r = q.resultant();
                let xc = q.resultant_position();
                let (dx, dy) = q.global_direction(props.angle);
                sum_fx = sum_fx.add(&Poly::constant(r * dx));
                sum_fy = sum_fy.add(&Poly::constant(r * dy));
                let r_perp = r * q.phi_deg.to_radians().sin();
                m = m.add(&Poly::linear(r_perp * xc, -r_perp));
            } else if q.x1 <= x0 + 1e-12 {
                // Segment lies inside the loaded stretch: closed-form
                // partial integrals over [x1, x] with q(ξ) linear.
                let d = q.span();
                let sl = if d > 0.0 { (q.q2 - q.q1) / d } else { 0.0 };
                let (x1l, q1) = (q.x1, q.q1);

                // Q(x) = ∫ q dξ = q1·(x-x1) + sl·(x-x1)²/2
                let q_int = Poly::cubic(
                    -q1 * x1l + sl * x1l * x1l / 2.0,
                    q1 - sl * x1l,
                    sl / 2.0,
                    0.0,
                );
                // MQ(x) = ∫ q·(x-ξ) dξ = q1·(x-x1)²/2 + sl·(x-x1)³/6
                let mq_int = Poly::cubic(
                    q1 * x1l * x1l / 2.0 - sl * x1l.powi(3) / 6.0,
                    -q1 * x1l + sl * x1l * x1l / 2.0,
                    q1 / 2.0 - sl * x1l / 2.0,
                    sl / 6.0,
                );

                let (dx, dy) = q.global_direction(props.angle);
                sum_fx = sum_fx.add(&q_int.scale(dx));
                sum_fy = sum_fy.add(&q_int.scale(dy));
                m = m.add(&mq_int.scale(-q.phi_deg.to_radians().sin()));
            }
        }

        // Internal forces at the cut, from the left free body:
        // N positive in tension, V along the clockwise perpendicular.
        let mut n = sum_fx.scale(-c);
        n.axpy(-s, &sum_fy);
        let mut v = sum_fx.scale(-s);
        v.axpy(c, &sum_fy);

        segments.push(Segment { x0, x1, n, v, m });
    }

    Diagram {
        bar: props.id,
        length,
        segments,
    }
}

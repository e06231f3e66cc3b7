#![allow(dead_code)]

use u_lineup::model::{Entry, Position, Slot};

/// Two quarterbacks, three backs, four receivers, two tight ends and two
/// defenses across teams A and B.
pub fn classic_pool() -> Vec<Entry> {
    let rows = [
        ("QB1", Position::QB, "A", 7500, 22.0, 0.15),
        ("QB2", Position::QB, "B", 7200, 21.0, 0.14),
        ("RB1", Position::RB, "A", 7000, 18.0, 0.20),
        ("RB2", Position::RB, "A", 6200, 17.0, 0.18),
        ("RB3", Position::RB, "B", 5800, 15.0, 0.12),
        ("WR1", Position::WR, "A", 6000, 16.0, 0.18),
        ("WR2", Position::WR, "A", 5400, 15.5, 0.16),
        ("WR3", Position::WR, "B", 5200, 14.5, 0.12),
        ("WR4", Position::WR, "B", 5000, 14.0, 0.11),
        ("TE1", Position::TE, "A", 3800, 12.0, 0.09),
        ("TE2", Position::TE, "B", 3200, 11.5, 0.08),
        ("DST1", Position::DST, "A", 2600, 8.0, 0.05),
        ("DST2", Position::DST, "B", 2400, 7.5, 0.04),
    ];
    rows.iter()
        .map(|&(name, pos, team, salary, proj, own)| {
            let opp = if team == "A" { "B" } else { "A" };
            Entry::new(name, team, opp, pos, salary, proj, own)
        })
        .collect()
}

/// Captain and flex variant of every classic-pool player. Captains cost
/// and score one and a half times the flex value.
pub fn showdown_pool() -> Vec<Entry> {
    classic_pool()
        .into_iter()
        .flat_map(|e| {
            let mut captain = e.clone().with_slot(Slot::Captain);
            captain.salary = e.salary * 3 / 2;
            captain.projection = e.projection * 1.5;
            [captain, e.with_slot(Slot::Flex)]
        })
        .collect()
}

/// Six teams in three games, eight entries per team (QB, two backs, three
/// receivers, a tight end and a defense). Salaries and projections are
/// seeded so the slate is the same on every run.
pub fn slate_pool() -> Vec<Entry> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let games = [("KC", "BUF"), ("DAL", "PHI"), ("SF", "MIA")];
    let shape = [
        (Position::QB, 55, 80),
        (Position::RB, 40, 85),
        (Position::RB, 40, 85),
        (Position::WR, 35, 85),
        (Position::WR, 35, 85),
        (Position::WR, 35, 85),
        (Position::TE, 25, 65),
        (Position::DST, 20, 40),
    ];
    let mut rng = StdRng::seed_from_u64(2026);
    let mut pool = Vec::new();
    for (home, away) in games {
        for (team, opp) in [(home, away), (away, home)] {
            for (i, &(pos, lo, hi)) in shape.iter().enumerate() {
                let salary = i64::from(rng.random_range(lo..hi)) * 100;
                let projection = salary as f64 / 1000.0 * 2.6 + rng.random_range(-3.0..3.0);
                let ownership = rng.random_range(0.01..0.30);
                let name = format!("{team}_{}{i}", pos.as_str());
                pool.push(Entry::new(name, team, opp, pos, salary, projection, ownership));
            }
        }
    }
    pool
}

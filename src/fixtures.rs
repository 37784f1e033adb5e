//! Shared test instances.

use crate::problem::{Host, ProblemInstance, Unit};
use crate::random::create_rng;
use rand::rngs::StdRng;
use rand::Rng;

pub const IDLE: f64 = 100.0;
pub const MAX: f64 = 200.0;

fn zeros(n: usize) -> Vec<Vec<f64>> {
    vec![vec![0.0; n]; n]
}

/// One host with 10 CPU; two units demanding 3 and 4.
pub fn single_host() -> ProblemInstance {
    ProblemInstance::new(
        vec![Unit::new(3.0, 1.0), Unit::new(4.0, 1.0)],
        vec![Host::new(10.0, 100.0).with_power(IDLE, MAX)],
        zeros(2),
        zeros(1),
    )
    .unwrap()
}

/// Two hosts with 4 CPU each; three units demanding 4 CPU each.
///
/// Total demand exceeds total capacity, so no placement is feasible.
pub fn overloaded_pair() -> ProblemInstance {
    ProblemInstance::new(
        vec![Unit::new(4.0, 2.0); 3],
        vec![Host::new(4.0, 10.0).with_power(IDLE, MAX); 2],
        zeros(3),
        zeros(2),
    )
    .unwrap()
}

/// Two units exchanging 2.0 traffic; unit 0 also sends 1.0 externally.
///
/// Host 0 has network capacity 2.5, so splitting the pair overloads it.
pub fn network_pair() -> ProblemInstance {
    ProblemInstance::new(
        vec![
            Unit::new(1.0, 1.0).with_external_traffic(1.0),
            Unit::new(1.0, 1.0),
        ],
        vec![
            Host::new(10.0, 10.0)
                .with_net(2.5)
                .with_power(IDLE, MAX)
                .with_gateway_cost(4.0),
            Host::new(10.0, 10.0)
                .with_net(10.0)
                .with_power(IDLE, MAX)
                .with_gateway_cost(4.0),
        ],
        vec![vec![0.0, 2.0], vec![2.0, 0.0]],
        vec![vec![0.0, 3.0], vec![3.0, 0.0]],
    )
    .unwrap()
}

/// Two hosts with 10 CPU; units demanding 0.1, 0.2 and 0.0 CPU.
///
/// Removing the first two units from a shared host by subtraction leaves a
/// rounding residue of about 2.8e-17 while the zero-demand unit stays.
pub fn fractional_trio() -> ProblemInstance {
    ProblemInstance::new(
        vec![
            Unit::new(0.1, 0.1),
            Unit::new(0.2, 0.2),
            Unit::new(0.0, 0.0),
        ],
        vec![Host::new(10.0, 10.0).with_power(IDLE, MAX); 2],
        zeros(3),
        zeros(2),
    )
    .unwrap()
}

/// A random instance with clustered traffic and a rack/pod cost topology.
///
/// Capacities are drawn so that some but not all random placements fit.
/// Demands are whole numbers.
pub fn random_instance(seed: u64, units: usize, hosts: usize) -> ProblemInstance {
    build_random(seed, units, hosts, |rng| {
        (rng.random_range(1..=4) as f64, rng.random_range(1..=8) as f64)
    })
}

/// Like [`random_instance`], but demands are tenths and about a quarter of
/// the units demand nothing at all.
pub fn fractional_instance(seed: u64, units: usize, hosts: usize) -> ProblemInstance {
    build_random(seed, units, hosts, |rng| {
        if rng.random_bool(0.25) {
            (0.0, 0.0)
        } else {
            (
                rng.random_range(1..=40) as f64 / 10.0,
                rng.random_range(1..=80) as f64 / 10.0,
            )
        }
    })
}

fn build_random<F>(seed: u64, units: usize, hosts: usize, mut demand: F) -> ProblemInstance
where
    F: FnMut(&mut StdRng) -> (f64, f64),
{
    let mut rng = create_rng(seed);

    let unit_list: Vec<Unit> = (0..units)
        .map(|_| {
            let (cpu, mem) = demand(&mut rng);
            Unit::new(cpu, mem).with_external_traffic(rng.random_range(0.0..1.0))
        })
        .collect();

    let host_list: Vec<Host> = (0..hosts)
        .map(|_| {
            let idle = rng.random_range(100.0..300.0);
            Host::new(rng.random_range(4..=12) as f64, rng.random_range(8..=24) as f64)
                .with_net(rng.random_range(5.0..20.0))
                .with_power(idle, idle + rng.random_range(100.0..400.0))
                .with_gateway_cost(4.0)
        })
        .collect();

    let clusters = (units / 4).max(1);
    let mut traffic = zeros(units);
    for i in 0..units {
        for j in (i + 1)..units {
            let w = if i % clusters == j % clusters {
                rng.random_range(0.0..2.0)
            } else if rng.random_bool(0.05) {
                rng.random_range(0.0..0.01)
            } else {
                0.0
            };
            traffic[i][j] = w;
            traffic[j][i] = w;
        }
    }

    let mut cost = zeros(hosts);
    for a in 0..hosts {
        for b in 0..hosts {
            cost[a][b] = if a == b {
                0.0
            } else if a / 2 == b / 2 {
                1.0
            } else if a / 4 == b / 4 {
                3.0
            } else {
                5.0
            };
        }
    }

    ProblemInstance::new(unit_list, host_list, traffic, cost).unwrap()
}

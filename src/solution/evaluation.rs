//! Objective and constraint math shared by both encodings.
//!
//! [`Evaluation`] holds every cached aggregate of a placement: per-host
//! CPU/memory/network usage, per-unit network usage, per-host overages,
//! and the two objectives. It is always computed from the direct
//! unit→host view, iterating units in index order, so two encodings of the
//! same assignment produce bit-identical values.
//!
//! # Cost model
//!
//! - CPU, memory and power update in O(1) per relocated unit.
//! - Network load and network cost depend on every pair of units and are
//!   recomputed in O(N_V²) after each relocation.

use super::Objectives;
use crate::problem::ProblemInstance;

/// Guard added to CPU capacity in the power model to avoid division by zero.
pub const POWER_EPSILON: f64 = 1e-9;

/// Power drawn by `host` when `cpu_used` units of CPU are allocated on it.
///
/// An empty host draws nothing. An active host draws its idle power plus
/// a share of the dynamic range proportional to CPU utilization.
#[inline]
pub fn host_power(problem: &ProblemInstance, host: usize, cpu_used: f64) -> f64 {
    if cpu_used <= 0.0 {
        return 0.0;
    }
    let h = problem.host(host);
    h.idle_power + (h.max_power - h.idle_power) * (cpu_used / (h.cpu + POWER_EPSILON))
}

/// Returns exactly zero when `usage` is no larger than the rounding error
/// that `units` additions and removals of magnitude up to `scale` can leave
/// behind; otherwise returns `usage` unchanged.
///
/// Incremental updates subtract demands in move order, so a host whose
/// remaining units all demand nothing can be left holding a residue such as
/// `0.1 + 0.2 - 0.1 - 0.2 = 2.8e-17`. Demands below this tolerance are
/// indistinguishable from that residue.
#[inline]
pub fn snap_to_zero(usage: f64, scale: f64, units: usize) -> f64 {
    if usage.abs() <= f64::EPSILON * scale * units as f64 {
        0.0
    } else {
        usage
    }
}

/// Non-negative per-host overage for each resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Violations {
    /// CPU overage per host.
    pub cpu: Vec<f64>,
    /// Memory overage per host.
    pub mem: Vec<f64>,
    /// Network overage per host.
    pub net: Vec<f64>,
}

impl Violations {
    fn zeros(hosts: usize) -> Self {
        Self {
            cpu: vec![0.0; hosts],
            mem: vec![0.0; hosts],
            net: vec![0.0; hosts],
        }
    }

    /// Sum of all overages over all resources and hosts.
    pub fn total(&self) -> f64 {
        self.cpu.iter().sum::<f64>() + self.mem.iter().sum::<f64>() + self.net.iter().sum::<f64>()
    }
}

/// Cached aggregates, constraint state and objectives of one placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    cpu_usage: Vec<f64>,
    mem_usage: Vec<f64>,
    net_usage: Vec<f64>,
    unit_net: Vec<f64>,
    violations: Violations,
    objectives: Objectives,
    total_violation: f64,
    infeasible: bool,
}

impl Evaluation {
    /// An all-zero evaluation sized for `problem`.
    pub(crate) fn new(problem: &ProblemInstance) -> Self {
        let hosts = problem.num_hosts();
        Self {
            cpu_usage: vec![0.0; hosts],
            mem_usage: vec![0.0; hosts],
            net_usage: vec![0.0; hosts],
            unit_net: vec![0.0; problem.num_units()],
            violations: Violations::zeros(hosts),
            objectives: Objectives::default(),
            total_violation: 0.0,
            infeasible: false,
        }
    }

    /// Recomputes everything from the direct view.
    pub(crate) fn evaluate_full(&mut self, problem: &ProblemInstance, assignment: &[usize]) {
        self.cpu_usage.fill(0.0);
        self.mem_usage.fill(0.0);
        for (unit, &host) in assignment.iter().enumerate() {
            let u = problem.unit(unit);
            self.cpu_usage[host] += u.cpu;
            self.mem_usage[host] += u.mem;
        }

        let mut power = 0.0;
        for host in 0..problem.num_hosts() {
            self.refresh_cpu_mem_violation(problem, host);
            power += host_power(problem, host, self.cpu_usage[host]);
        }
        self.objectives.power = power;

        self.refresh_network(problem, assignment);
        self.update_status();
    }

    /// Applies the CPU, memory and power effect of moving `unit` from
    /// `from` to `to`.
    ///
    /// `source_emptied` must be true when `from` hosts no unit after the
    /// move; its usage is then reset to exactly zero. A source that keeps
    /// only zero-demand units gets the same treatment through
    /// [`snap_to_zero`]: a usage within rounding distance of zero becomes
    /// exactly zero, so the host draws no power, as it would under a full
    /// evaluation.
    ///
    /// Network state is left stale: call [`refresh_network`](Self::refresh_network)
    /// and [`update_status`](Self::update_status) afterwards.
    pub(crate) fn apply_move(
        &mut self,
        problem: &ProblemInstance,
        unit: usize,
        from: usize,
        to: usize,
        source_emptied: bool,
    ) {
        let u = problem.unit(unit);

        let before = host_power(problem, from, self.cpu_usage[from])
            + host_power(problem, to, self.cpu_usage[to]);

        if source_emptied {
            self.cpu_usage[from] = 0.0;
            self.mem_usage[from] = 0.0;
        } else {
            let h = problem.host(from);
            let units = problem.num_units();
            self.cpu_usage[from] =
                snap_to_zero(self.cpu_usage[from] - u.cpu, h.cpu.max(self.cpu_usage[from]), units);
            self.mem_usage[from] =
                snap_to_zero(self.mem_usage[from] - u.mem, h.mem.max(self.mem_usage[from]), units);
        }
        self.cpu_usage[to] += u.cpu;
        self.mem_usage[to] += u.mem;

        self.refresh_cpu_mem_violation(problem, from);
        self.refresh_cpu_mem_violation(problem, to);

        let after = host_power(problem, from, self.cpu_usage[from])
            + host_power(problem, to, self.cpu_usage[to]);
        self.objectives.power += after - before;
    }

    /// Recomputes per-unit and per-host network load, network overages and
    /// the network objective.
    pub(crate) fn refresh_network(&mut self, problem: &ProblemInstance, assignment: &[usize]) {
        self.net_usage.fill(0.0);

        let mut pairwise = 0.0;
        let mut external = 0.0;
        for (i, &hi) in assignment.iter().enumerate() {
            let unit = problem.unit(i);
            let mut crossing = 0.0;
            for (j, &weight) in problem.traffic_row(i).iter().enumerate() {
                let hj = assignment[j];
                if hi != hj {
                    crossing += weight;
                }
                pairwise += weight * problem.topology_cost(hi, hj);
            }
            self.unit_net[i] = unit.external_traffic + crossing;
            self.net_usage[hi] += self.unit_net[i];
            external += unit.external_traffic * problem.host(hi).gateway_cost;
        }

        for (host, overage) in self.violations.net.iter_mut().enumerate() {
            *overage = (self.net_usage[host] - problem.host(host).net).max(0.0);
        }

        // Ordered pairs count each symmetric link twice.
        self.objectives.network = 0.5 * pairwise + external;
    }

    /// Recomputes the total violation and the infeasibility flag.
    pub(crate) fn update_status(&mut self) {
        self.total_violation = self.violations.total();
        self.infeasible = self.total_violation > 0.0;
    }

    fn refresh_cpu_mem_violation(&mut self, problem: &ProblemInstance, host: usize) {
        let h = problem.host(host);
        self.violations.cpu[host] = (self.cpu_usage[host] - h.cpu).max(0.0);
        self.violations.mem[host] = (self.mem_usage[host] - h.mem).max(0.0);
    }

    /// Objective vector.
    #[inline]
    pub fn objectives(&self) -> &Objectives {
        &self.objectives
    }

    /// Per-host, per-resource overages.
    pub fn violations(&self) -> &Violations {
        &self.violations
    }

    /// Sum of all overages, as of the last status update.
    #[inline]
    pub fn total_violation(&self) -> f64 {
        self.total_violation
    }

    /// Whether any capacity is exceeded, as of the last status update.
    #[inline]
    pub fn is_infeasible(&self) -> bool {
        self.infeasible
    }

    /// CPU allocated on each host.
    pub fn cpu_usage(&self) -> &[f64] {
        &self.cpu_usage
    }

    /// Memory allocated on each host.
    pub fn mem_usage(&self) -> &[f64] {
        &self.mem_usage
    }

    /// Network load on each host.
    pub fn net_usage(&self) -> &[f64] {
        &self.net_usage
    }

    /// Network load generated by each unit (external plus cross-host traffic).
    pub fn unit_net(&self) -> &[f64] {
        &self.unit_net
    }

    /// Whether `host` exceeds its CPU or memory capacity.
    #[inline]
    pub fn is_overloaded(&self, problem: &ProblemInstance, host: usize) -> bool {
        let h = problem.host(host);
        self.cpu_usage[host] > h.cpu || self.mem_usage[host] > h.mem
    }

    /// CPU and memory still free on `host` (negative when overloaded).
    #[inline]
    pub fn residual(&self, problem: &ProblemInstance, host: usize) -> (f64, f64) {
        let h = problem.host(host);
        (h.cpu - self.cpu_usage[host], h.mem - self.mem_usage[host])
    }
}

//! Problem instance data.
//!
//! A [`ProblemInstance`] is the immutable input of one search run: the
//! placeable units with their demands, the hosts with their capacities and
//! power model, and the two pairwise matrices that drive the network
//! objective. All dimension checks happen once, in [`ProblemInstance::new`];
//! the search core indexes freely afterwards.

use crate::error::{Error, Result};

/// Relative tolerance for the traffic-matrix symmetry check.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A placeable unit (for example a virtual machine).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    /// CPU demand.
    pub cpu: f64,
    /// Memory demand.
    pub mem: f64,
    /// Traffic exchanged with the outside world through a gateway.
    pub external_traffic: f64,
}

impl Unit {
    /// Creates a unit with no external traffic.
    pub fn new(cpu: f64, mem: f64) -> Self {
        Self {
            cpu,
            mem,
            external_traffic: 0.0,
        }
    }

    /// Sets the external traffic volume.
    pub fn with_external_traffic(mut self, traffic: f64) -> Self {
        self.external_traffic = traffic;
        self
    }
}

/// A host (for example a physical server) that units are placed on.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Host {
    /// CPU capacity.
    pub cpu: f64,
    /// Memory capacity.
    pub mem: f64,
    /// Network capacity.
    pub net: f64,
    /// Power draw of an active host at zero utilization.
    pub idle_power: f64,
    /// Power draw at full CPU utilization.
    pub max_power: f64,
    /// Cost of routing one unit of external traffic through this host's gateway.
    pub gateway_cost: f64,
}

impl Host {
    /// Creates a host with the given capacities, unlimited network and no power draw.
    pub fn new(cpu: f64, mem: f64) -> Self {
        Self {
            cpu,
            mem,
            net: f64::MAX,
            idle_power: 0.0,
            max_power: 0.0,
            gateway_cost: 0.0,
        }
    }

    /// Sets the network capacity.
    pub fn with_net(mut self, net: f64) -> Self {
        self.net = net;
        self
    }

    /// Sets the linear power model.
    pub fn with_power(mut self, idle: f64, max: f64) -> Self {
        self.idle_power = idle;
        self.max_power = max;
        self
    }

    /// Sets the gateway cost.
    pub fn with_gateway_cost(mut self, cost: f64) -> Self {
        self.gateway_cost = cost;
        self
    }
}

/// Plain, unvalidated instance data.
///
/// This is the exchange format with instance generators and loaders.
/// Convert it with [`ProblemInstance::try_from`] to get a validated
/// instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceData {
    /// Placeable units.
    pub units: Vec<Unit>,
    /// Hosts.
    pub hosts: Vec<Host>,
    /// Symmetric unit-to-unit traffic weights, `units.len()` square.
    pub traffic: Vec<Vec<f64>>,
    /// Host-to-host topology cost, `hosts.len()` square.
    pub topology_cost: Vec<Vec<f64>>,
}

/// Validated, read-only input of a placement search.
///
/// # Examples
///
/// ```
/// use u_placement::problem::{Host, ProblemInstance, Unit};
///
/// let problem = ProblemInstance::new(
///     vec![Unit::new(2.0, 4.0), Unit::new(1.0, 1.0)],
///     vec![Host::new(8.0, 16.0).with_power(100.0, 200.0)],
///     vec![vec![0.0, 1.5], vec![1.5, 0.0]],
///     vec![vec![0.0]],
/// )
/// .unwrap();
///
/// assert_eq!(problem.num_units(), 2);
/// assert_eq!(problem.num_hosts(), 1);
/// assert_eq!(problem.traffic(0, 1), 1.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "InstanceData", into = "InstanceData")
)]
pub struct ProblemInstance {
    units: Vec<Unit>,
    hosts: Vec<Host>,
    // Row-major, num_units x num_units.
    traffic: Vec<f64>,
    // Row-major, num_hosts x num_hosts.
    topology_cost: Vec<f64>,
}

impl ProblemInstance {
    /// Validates and builds an instance.
    ///
    /// # Errors
    ///
    /// Returns an error if either set is empty, a matrix has the wrong
    /// shape, any value is negative or non-finite, a host's idle power
    /// exceeds its max power, or the traffic matrix is asymmetric.
    pub fn new(
        units: Vec<Unit>,
        hosts: Vec<Host>,
        traffic: Vec<Vec<f64>>,
        topology_cost: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if hosts.is_empty() {
            return Err(Error::NoHosts);
        }
        if units.is_empty() {
            return Err(Error::NoUnits);
        }

        for (i, unit) in units.iter().enumerate() {
            check_value("unit cpu", i, unit.cpu)?;
            check_value("unit mem", i, unit.mem)?;
            check_value("unit external traffic", i, unit.external_traffic)?;
        }
        for (j, host) in hosts.iter().enumerate() {
            check_value("host cpu", j, host.cpu)?;
            check_value("host mem", j, host.mem)?;
            check_value("host net", j, host.net)?;
            check_value("host idle power", j, host.idle_power)?;
            check_value("host max power", j, host.max_power)?;
            check_value("host gateway cost", j, host.gateway_cost)?;
            if host.idle_power > host.max_power {
                return Err(Error::PowerModel {
                    host: j,
                    idle: host.idle_power,
                    max: host.max_power,
                });
            }
        }

        let traffic = flatten_square("traffic matrix", traffic, units.len())?;
        let topology_cost = flatten_square("topology cost matrix", topology_cost, hosts.len())?;

        let n = units.len();
        for row in 0..n {
            for col in (row + 1)..n {
                let a = traffic[row * n + col];
                let b = traffic[col * n + row];
                let scale = a.abs().max(b.abs()).max(1.0);
                if (a - b).abs() > SYMMETRY_TOLERANCE * scale {
                    return Err(Error::AsymmetricTraffic { row, col });
                }
            }
        }

        Ok(Self {
            units,
            hosts,
            traffic,
            topology_cost,
        })
    }

    /// Number of placeable units (N_V).
    #[inline]
    pub fn num_units(&self) -> usize {
        self.units.len()
    }

    /// Number of hosts (N_P).
    #[inline]
    pub fn num_hosts(&self) -> usize {
        self.hosts.len()
    }

    /// All units.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// All hosts.
    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    /// The unit at `index`.
    #[inline]
    pub fn unit(&self, index: usize) -> &Unit {
        &self.units[index]
    }

    /// The host at `index`.
    #[inline]
    pub fn host(&self, index: usize) -> &Host {
        &self.hosts[index]
    }

    /// Traffic weight between units `a` and `b`.
    #[inline]
    pub fn traffic(&self, a: usize, b: usize) -> f64 {
        self.traffic[a * self.units.len() + b]
    }

    /// Traffic weights from unit `a` to every unit.
    #[inline]
    pub fn traffic_row(&self, a: usize) -> &[f64] {
        let n = self.units.len();
        &self.traffic[a * n..(a + 1) * n]
    }

    /// Topology cost between hosts `a` and `b`.
    #[inline]
    pub fn topology_cost(&self, a: usize, b: usize) -> f64 {
        self.topology_cost[a * self.hosts.len() + b]
    }

    /// Whether a unit's demand fits into the given residual capacity.
    #[inline]
    pub(crate) fn fits(&self, unit: usize, free_cpu: f64, free_mem: f64) -> bool {
        let u = &self.units[unit];
        u.cpu <= free_cpu && u.mem <= free_mem
    }
}

impl TryFrom<InstanceData> for ProblemInstance {
    type Error = Error;

    fn try_from(data: InstanceData) -> Result<Self> {
        Self::new(data.units, data.hosts, data.traffic, data.topology_cost)
    }
}

impl From<ProblemInstance> for InstanceData {
    fn from(problem: ProblemInstance) -> Self {
        let n = problem.units.len();
        let m = problem.hosts.len();
        Self {
            traffic: problem.traffic.chunks(n).map(<[f64]>::to_vec).collect(),
            topology_cost: problem.topology_cost.chunks(m).map(<[f64]>::to_vec).collect(),
            units: problem.units,
            hosts: problem.hosts,
        }
    }
}

fn check_value(what: &'static str, index: usize, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidValue { what, index, value })
    }
}

fn flatten_square(what: &'static str, rows: Vec<Vec<f64>>, size: usize) -> Result<Vec<f64>> {
    if rows.len() != size {
        return Err(Error::DimensionMismatch {
            what,
            expected: size,
            actual: rows.len(),
        });
    }
    let mut flat = Vec::with_capacity(size * size);
    for row in rows {
        if row.len() != size {
            return Err(Error::DimensionMismatch {
                what,
                expected: size,
                actual: row.len(),
            });
        }
        flat.extend(row);
    }
    for (i, &v) in flat.iter().enumerate() {
        check_value(what, i, v)?;
    }
    Ok(flat)
}

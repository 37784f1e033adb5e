//! NSGA-II generational loop.
//!
//! [`EvolutionEngine`] drives the complete process:
//! initialization → sort → crowd → (reproduce → truncate → re-sort →
//! re-crowd) × generations.

use super::config::NsgaConfig;
use super::construction::random_first_fit;
use super::selection::select_parents;
use super::sorting::{crowd_all_fronts, crowding_distance, fast_non_dominated_sort};
use super::types::Reproduction;
use super::{ClassicOperators, HybridOperators};
use crate::error::Result;
use crate::population::PopulationSet;
use crate::problem::ProblemInstance;
use crate::random::create_rng;
use crate::solution::Solution;
use log::{debug, info};
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Engine over the direct encoding.
pub type ClassicEngine<'p> = EvolutionEngine<'p, ClassicOperators>;

/// Engine over the grouped encoding.
pub type HybridEngine<'p> = EvolutionEngine<'p, HybridOperators>;

/// Summary of one population, recorded after initialization and after
/// every generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Generation index; 0 is the initial population.
    pub generation: usize,
    /// Population size after selection.
    pub population: usize,
    /// Number of non-domination fronts.
    pub fronts: usize,
    /// Size of the rank-0 front.
    pub pareto_size: usize,
    /// Solutions with no capacity violation.
    pub feasible: usize,
    /// Lowest power on the rank-0 front.
    pub best_power: f64,
    /// Lowest network cost on the rank-0 front.
    pub best_network: f64,
}

impl GenerationStats {
    /// Summarizes a sorted population.
    pub fn from_population<S: Solution>(generation: usize, population: &PopulationSet<S>) -> Self {
        let (best_power, best_network) = population.front(0).fold(
            (f64::INFINITY, f64::INFINITY),
            |(p, n), s| (p.min(s.objectives().power), n.min(s.objectives().network)),
        );
        Self {
            generation,
            population: population.len(),
            fronts: population.fronts().len(),
            pareto_size: population.fronts().first().map_or(0, Vec::len),
            feasible: population.feasible_count(),
            best_power,
            best_network,
        }
    }
}

/// Result of one run.
#[derive(Debug, Clone)]
pub struct NsgaResult<S: Solution> {
    /// Final population, sorted and crowded; front 0 is the approximate
    /// Pareto set.
    pub population: PopulationSet<S>,

    /// Generations executed (always the configured budget).
    pub generations: usize,

    /// Statistics for the initial population followed by one entry per
    /// generation.
    pub history: Vec<GenerationStats>,
}

impl<S: Solution> NsgaResult<S> {
    /// Rank-0 solutions of the final population.
    pub fn pareto_front(&self) -> Vec<&S> {
        self.population.pareto_front()
    }

    /// `[power, network]` points of the final rank-0 front.
    pub fn pareto_points(&self) -> Vec<[f64; 2]> {
        self.population.pareto_points()
    }
}

/// Executes the NSGA-II loop for one encoding.
///
/// The engine borrows a validated [`ProblemInstance`] and owns nothing
/// mutable between runs: every run creates its own generator and
/// population, so one engine can serve many independent runs.
///
/// # Usage
///
/// ```
/// use u_placement::nsga::{ClassicEngine, NsgaConfig};
/// use u_placement::problem::{Host, ProblemInstance, Unit};
///
/// let problem = ProblemInstance::new(
///     vec![Unit::new(2.0, 1.0), Unit::new(3.0, 1.0), Unit::new(1.0, 2.0)],
///     vec![Host::new(4.0, 4.0).with_power(50.0, 100.0); 3],
///     vec![vec![0.0; 3]; 3],
///     vec![vec![0.0, 1.0, 1.0], vec![1.0, 0.0, 1.0], vec![1.0, 1.0, 0.0]],
/// )
/// .unwrap();
///
/// let config = NsgaConfig::default()
///     .with_population_size(10)
///     .with_max_generations(5)
///     .with_seed(42);
/// let engine = ClassicEngine::new(&problem, config).unwrap();
/// let result = engine.run();
///
/// assert_eq!(result.population.len(), 10);
/// assert!(!result.pareto_front().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct EvolutionEngine<'p, O: Reproduction> {
    problem: &'p ProblemInstance,
    config: NsgaConfig,
    operators: O,
}

impl<'p, O: Reproduction> EvolutionEngine<'p, O> {
    /// Creates an engine with operators built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the
    /// configuration does not validate.
    pub fn new(problem: &'p ProblemInstance, config: NsgaConfig) -> Result<Self> {
        let operators = O::from_config(&config);
        Self::with_operators(problem, config, operators)
    }

    /// Creates an engine with explicitly constructed operators.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the
    /// configuration does not validate.
    pub fn with_operators(problem: &'p ProblemInstance, config: NsgaConfig, operators: O) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            problem,
            config,
            operators,
        })
    }

    /// The problem being solved.
    pub fn problem(&self) -> &'p ProblemInstance {
        self.problem
    }

    /// The run configuration.
    pub fn config(&self) -> &NsgaConfig {
        &self.config
    }

    /// The variation operators.
    pub fn operators(&self) -> &O {
        &self.operators
    }

    /// Builds `population_size` evaluated solutions by randomized first-fit.
    pub fn generate_population<R: Rng>(&self, rng: &mut R) -> PopulationSet<O::Solution> {
        let solutions = (0..self.config.population_size)
            .map(|_| O::Solution::from_assignment(self.problem, random_first_fit(self.problem, rng)))
            .collect();
        PopulationSet::new(solutions)
    }

    /// Produces exactly `population_size` children from a sorted and crowded
    /// population.
    ///
    /// Parents come from two crowded tournaments. With the crossover
    /// probability they recombine, otherwise both are cloned unchanged. Each
    /// child is then mutated with the mutation probability. With an odd
    /// budget the last second child is dropped.
    pub fn create_offspring<R: Rng>(
        &self,
        parents: &PopulationSet<O::Solution>,
        rng: &mut R,
    ) -> Vec<O::Solution> {
        let target = self.config.population_size;
        let pool = parents.solutions();
        let mut offspring = Vec::with_capacity(target);

        while offspring.len() < target {
            let (i, j) = select_parents(pool, rng);

            let (mut first, mut second) = if rng.random_bool(self.config.crossover_probability) {
                self.operators.crossover(self.problem, &pool[i], &pool[j], rng)
            } else {
                (pool[i].clone(), pool[j].clone())
            };

            if rng.random_bool(self.config.mutation_probability) {
                self.operators.mutate(self.problem, &mut first, rng);
            }
            if rng.random_bool(self.config.mutation_probability) {
                self.operators.mutate(self.problem, &mut second, rng);
            }

            offspring.push(first);
            if offspring.len() < target {
                offspring.push(second);
            }
        }
        offspring
    }

    /// Truncates a parent ∪ offspring union to `population_size`.
    ///
    /// Whole fronts are accepted in rank order while they fit; the first
    /// front that would overflow contributes its least crowded members.
    /// The returned population is unsorted: ranks and distances still refer
    /// to the union.
    pub fn environmental_selection(&self, mut union: PopulationSet<O::Solution>) -> PopulationSet<O::Solution> {
        let target = self.config.population_size;
        fast_non_dominated_sort(&mut union);

        let fronts = union.fronts().to_vec();
        let mut chosen: Vec<usize> = Vec::with_capacity(target);
        for front in &fronts {
            if chosen.len() == target {
                break;
            }
            crowding_distance(union.solutions_mut(), front);

            if chosen.len() + front.len() <= target {
                chosen.extend_from_slice(front);
            } else {
                let sols = union.solutions();
                let mut order = front.clone();
                order.sort_by(|&a, &b| {
                    sols[b]
                        .nsga()
                        .crowding_distance
                        .total_cmp(&sols[a].nsga().crowding_distance)
                });
                let needed = target - chosen.len();
                chosen.extend(order.into_iter().take(needed));
            }
        }

        let mut slots: Vec<Option<O::Solution>> = union.into_solutions().into_iter().map(Some).collect();
        let survivors = chosen
            .into_iter()
            .map(|i| slots[i].take().expect("fronts partition the union"))
            .collect();
        PopulationSet::new(survivors)
    }

    /// Runs with the configured seed, or a random one.
    pub fn run(&self) -> NsgaResult<O::Solution> {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        info!("{} NSGA-II seed={}", O::NAME, seed);
        self.run_with_rng(&mut create_rng(seed))
    }

    /// Runs the full generation budget with an explicit generator.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> NsgaResult<O::Solution> {
        let generations = self.config.max_generations;
        info!(
            "{} NSGA-II start: {} units, {} hosts, population {}, {} generations",
            O::NAME,
            self.problem.num_units(),
            self.problem.num_hosts(),
            self.config.population_size,
            generations
        );

        let mut population = self.generate_population(rng);
        fast_non_dominated_sort(&mut population);
        crowd_all_fronts(&mut population);

        let mut history = Vec::with_capacity(generations + 1);
        history.push(GenerationStats::from_population(0, &population));

        for generation in 1..=generations {
            let offspring = self.create_offspring(&population, rng);
            population.extend(offspring);

            population = self.environmental_selection(population);
            fast_non_dominated_sort(&mut population);
            crowd_all_fronts(&mut population);

            let stats = GenerationStats::from_population(generation, &population);
            debug!(
                "generation {}: {} fronts, pareto {}, feasible {}/{}, best power {:.3}, best network {:.3}",
                stats.generation,
                stats.fronts,
                stats.pareto_size,
                stats.feasible,
                stats.population,
                stats.best_power,
                stats.best_network
            );
            history.push(stats);
        }

        info!(
            "{} NSGA-II done: pareto front {}, feasible {}/{}",
            O::NAME,
            population.fronts().first().map_or(0, Vec::len),
            population.feasible_count(),
            population.len()
        );

        NsgaResult {
            population,
            generations,
            history,
        }
    }

    /// Runs once per seed; runs share nothing but the problem.
    ///
    /// With the `parallel` feature the runs execute on the rayon pool.
    /// Results come back in seed order either way.
    pub fn run_seeds(&self, seeds: &[u64]) -> Vec<NsgaResult<O::Solution>> {
        #[cfg(feature = "parallel")]
        {
            seeds
                .par_iter()
                .map(|&seed| self.run_with_rng(&mut create_rng(seed)))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            seeds
                .iter()
                .map(|&seed| self.run_with_rng(&mut create_rng(seed)))
                .collect()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fixtures;
    use crate::solution::{ClassicSolution, HybridSolution};

    fn config(pop: usize, gens: usize) -> NsgaConfig {
        NsgaConfig::default()
            .with_population_size(pop)
            .with_max_generations(gens)
            .with_seed(42)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let problem = fixtures::single_host();
        let result = ClassicEngine::new(&problem, config(1, 10));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_generate_population_places_every_unit() {
        let problem = fixtures::random_instance(1, 20, 6);
        let engine = HybridEngine::new(&problem, config(30, 1)).unwrap();
        let pop = engine.generate_population(&mut create_rng(1));
        assert_eq!(pop.len(), 30);
        for s in &pop {
            assert_eq!(s.assignment().len(), 20);
            assert!(s.assignment().iter().all(|&h| h < 6));
            let placed: usize = s.groups().iter().map(Vec::len).sum();
            assert_eq!(placed, 20);
        }
    }

    #[test]
    fn test_initial_population_is_evaluated() {
        let problem = fixtures::single_host();
        let engine = ClassicEngine::new(&problem, config(4, 1)).unwrap();
        let pop = engine.generate_population(&mut create_rng(3));
        let expected = fixtures::IDLE + (fixtures::MAX - fixtures::IDLE) * 0.7;
        for s in &pop {
            assert!((s.objectives().power - expected).abs() < 1e-6);
            assert_eq!(s.total_violation(), 0.0);
        }
    }

    #[test]
    fn test_offspring_count_with_odd_budget() {
        let problem = fixtures::random_instance(2, 12, 4);
        let engine = ClassicEngine::new(&problem, config(7, 1)).unwrap();
        let mut rng = create_rng(2);
        let mut pop = engine.generate_population(&mut rng);
        fast_non_dominated_sort(&mut pop);
        crowd_all_fronts(&mut pop);
        assert_eq!(engine.create_offspring(&pop, &mut rng).len(), 7);
    }

    #[test]
    fn test_environmental_selection_keeps_population_size() {
        let problem = fixtures::random_instance(3, 15, 5);
        let engine = HybridEngine::new(&problem, config(11, 1)).unwrap();
        let mut rng = create_rng(3);
        let mut union = engine.generate_population(&mut rng);
        union.extend(engine.generate_population(&mut rng).into_solutions());
        assert_eq!(union.len(), 22);
        assert_eq!(engine.environmental_selection(union).len(), 11);
    }

    #[test]
    fn test_truncation_keeps_best_fronts() {
        let problem = fixtures::overloaded_pair();
        let engine = ClassicEngine::new(&problem, config(2, 1)).unwrap();
        let union = PopulationSet::new(vec![
            ClassicSolution::from_assignment(&problem, vec![0, 0, 0]),
            ClassicSolution::from_assignment(&problem, vec![0, 0, 1]),
            ClassicSolution::from_assignment(&problem, vec![1, 1, 1]),
            ClassicSolution::from_assignment(&problem, vec![0, 1, 1]),
        ]);
        let survivors = engine.environmental_selection(union);
        assert_eq!(survivors.len(), 2);
        // Violation 4 beats violation 8.
        assert!(survivors.iter().all(|s| s.total_violation() == 4.0));
    }

    #[test]
    fn test_population_size_invariant_every_generation() {
        let problem = fixtures::random_instance(4, 16, 6);
        let engine = ClassicEngine::new(&problem, config(9, 15)).unwrap();
        let result = engine.run();
        assert_eq!(result.population.len(), 9);
        assert_eq!(result.generations, 15);
        assert_eq!(result.history.len(), 16);
        for (generation, stats) in result.history.iter().enumerate() {
            assert_eq!(stats.generation, generation);
            assert_eq!(stats.population, 9);
            assert!(stats.pareto_size >= 1 && stats.pareto_size <= 9);
            assert!(stats.feasible <= 9);
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let problem = fixtures::random_instance(5, 14, 5);
        let a = HybridEngine::new(&problem, config(12, 10)).unwrap().run();
        let b = HybridEngine::new(&problem, config(12, 10)).unwrap().run();
        assert_eq!(a.pareto_points(), b.pareto_points());
        let sa: Vec<&[usize]> = a.population.iter().map(|s| s.assignment()).collect();
        let sb: Vec<&[usize]> = b.population.iter().map(|s| s.assignment()).collect();
        assert_eq!(sa, sb);
    }

    #[test]
    fn test_final_front_is_non_dominated() {
        let problem = fixtures::random_instance(6, 18, 6);
        let result = ClassicEngine::new(&problem, config(20, 10)).unwrap().run();
        let front = result.pareto_front();
        for a in &front {
            assert!(!result.population.iter().any(|b| b.dominates(a)));
        }
    }

    #[test]
    fn test_feasible_solutions_survive() {
        // Plenty of room: the final front must be feasible.
        let problem = fixtures::random_instance(7, 8, 8);
        let result = HybridEngine::new(&problem, config(16, 20)).unwrap().run();
        let first = &result.history[0];
        let last = result.history.last().unwrap();
        assert!(last.feasible >= first.feasible.min(16));
        if first.feasible > 0 {
            assert!(result.pareto_front().iter().all(|s| !s.is_infeasible()));
        }
    }

    #[test]
    fn test_unresolvable_instance_still_completes() {
        let problem = fixtures::overloaded_pair();
        let result = ClassicEngine::new(&problem, config(6, 5)).unwrap().run();
        assert_eq!(result.population.len(), 6);
        assert!(result.population.iter().all(|s| s.is_infeasible()));
        assert!(result.pareto_front().iter().all(|s| s.total_violation() == 4.0));
    }

    #[test]
    fn test_run_seeds_matches_single_runs() {
        let problem = fixtures::random_instance(8, 10, 4);
        let engine = ClassicEngine::new(&problem, config(8, 4)).unwrap();
        let results = engine.run_seeds(&[1, 2, 3]);
        assert_eq!(results.len(), 3);
        for (seed, result) in [1u64, 2, 3].into_iter().zip(&results) {
            let single = engine.run_with_rng(&mut create_rng(seed));
            assert_eq!(single.pareto_points(), result.pareto_points());
        }
    }

    #[test]
    fn test_both_encodings_run() {
        let problem = fixtures::network_pair();
        let classic: NsgaResult<ClassicSolution> =
            ClassicEngine::new(&problem, config(4, 3)).unwrap().run();
        let hybrid: NsgaResult<HybridSolution> =
            HybridEngine::new(&problem, config(4, 3)).unwrap().run();
        assert!(!classic.pareto_front().is_empty());
        assert!(!hybrid.pareto_front().is_empty());
        // Co-location on one host is optimal in both objectives.
        for points in [classic.pareto_points(), hybrid.pareto_points()] {
            assert!(points.iter().all(|p| p[1] <= 4.0 + 1e-9));
        }
    }
}

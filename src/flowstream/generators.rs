//! Flow record generators for demos, benchmarks and tests.
//!
//! These produce schema-complete records (see [`netflow`]) with
//! controllable source and destination distributions, so concurrency
//! scenarios can steer traffic at a single vertex or spread it across
//! many.

use crate::flowstream::record::netflow;
use crate::flowstream::record::FlowRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generator of flows towards one destination IP
///
/// Destination ports rotate round-robin through `num_ports` values, so a
/// top-k ranking of the destination-port field converges to uniform
/// frequencies across the port set. Source IP and timestamps are fixed by
/// the caller per generated record.
pub struct UniformDestPort {
    dest_ip: String,
    num_ports: u16,
    next_port: u16,
}

impl UniformDestPort {
    /// Create a generator towards `dest_ip` cycling over `num_ports` ports
    pub fn new(dest_ip: &str, num_ports: u16) -> Self {
        UniformDestPort {
            dest_ip: dest_ip.to_string(),
            num_ports: num_ports.max(1),
            next_port: 0,
        }
    }

    /// Generate the next flow record
    pub fn generate(&mut self, id: u64, time_seconds: f64) -> FlowRecord {
        let port = 10_000 + i64::from(self.next_port);
        self.next_port = (self.next_port + 1) % self.num_ports;
        netflow::make_netflow(
            id,
            time_seconds,
            "10.0.0.1",
            &self.dest_ip,
            54_321,
            port,
            0.1,
        )
    }
}

/// Generator of randomized flows between small address pools
///
/// Sources and destinations are drawn uniformly from pools of the given
/// sizes; ports and durations are randomized. Deterministic for a fixed
/// seed.
pub struct RandomPoolGenerator {
    rng: StdRng,
    source_pool: usize,
    dest_pool: usize,
    clock: f64,
}

impl RandomPoolGenerator {
    /// Create a seeded generator over the given pool sizes
    pub fn new(seed: u64, source_pool: usize, dest_pool: usize) -> Self {
        RandomPoolGenerator {
            rng: StdRng::seed_from_u64(seed),
            source_pool: source_pool.max(1),
            dest_pool: dest_pool.max(1),
            clock: 0.0,
        }
    }

    /// Generate the next flow record; time advances monotonically
    pub fn generate(&mut self, id: u64) -> FlowRecord {
        self.clock += self.rng.gen_range(0.0001..0.01);
        let source = self.rng.gen_range(0..self.source_pool);
        let dest = self.rng.gen_range(0..self.dest_pool);
        netflow::make_netflow(
            id,
            self.clock,
            &format!("10.0.{}.{}", source / 256, source % 256),
            &format!("192.168.{}.{}", dest / 256, dest % 256),
            self.rng.gen_range(1024..65_535),
            i64::from(self.rng.gen_range(1u16..1024)),
            self.rng.gen_range(0.0..2.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowstream::record::netflow::{DEST_IP, DEST_PORT};
    use crate::flowstream::record::FieldValue;

    #[test]
    fn test_uniform_dest_port_cycles_ports() {
        let mut generator = UniformDestPort::new("192.168.0.1", 2);
        let ports: Vec<_> = (0..4)
            .map(|i| {
                let record = generator.generate(i, i as f64);
                record.field(DEST_PORT).unwrap().as_i64().unwrap()
            })
            .collect();
        assert_eq!(ports, vec![10_000, 10_001, 10_000, 10_001]);
    }

    #[test]
    fn test_uniform_dest_port_fixes_destination() {
        let mut generator = UniformDestPort::new("192.168.0.9", 3);
        let record = generator.generate(0, 1.0);
        assert_eq!(
            record.field(DEST_IP).unwrap(),
            &FieldValue::String("192.168.0.9".to_string())
        );
    }

    #[test]
    fn test_random_pool_generator_is_deterministic_per_seed() {
        let mut first = RandomPoolGenerator::new(11, 4, 4);
        let mut second = RandomPoolGenerator::new(11, 4, 4);
        assert_eq!(first.generate(0), second.generate(0));
        assert_eq!(first.generate(1), second.generate(1));
    }
}

//! Demonstration scenarios
//!
//! Two scripted walkthroughs of the eviction policy, each run against a
//! fresh cache of capacity 5.

/// A named harness script.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub script: &'static str,
}

/// Updates, touches and an insert that must reclaim the one elapsed entry.
pub const TOUCH_AND_EXPIRE: Scenario = Scenario {
    name: "Test-1",
    script: "\
set A 1 5 100
set B 2 5 3
set C 3 5 10
set A 10 5 100
get A
get B
# D and E fill the cache, F evicts the LRU key of priority 5
set D 4 5 100
set E 5 5 100
set F 6 5 100
get C
get B
sleep 5
# B (expiry 3) has elapsed and goes before anything else
set G 7 5 100
get B
",
};

/// Capacity shrinks one step at a time.
pub const SHRINK_CAPACITY: Scenario = Scenario {
    name: "Test-2",
    script: "\
set A 1 5 100
set B 2 15 3
set C 3 5 10
set D 4 1 15
set E 5 5 150
sleep 5
max 4
keys
max 3
keys
max 2
keys
max 1
keys
",
};

pub const SCENARIOS: [Scenario; 2] = [TOUCH_AND_EXPIRE, SHRINK_CAPACITY];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::parse_script;

    #[test]
    fn test_scenarios_parse() {
        for scenario in SCENARIOS {
            let commands = parse_script(scenario.script).unwrap();
            assert!(!commands.is_empty(), "{} has no commands", scenario.name);
        }
    }
}

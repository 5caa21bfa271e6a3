//! Statistical utilities for training diagnostics and benchmark summaries.
//!
//! - [`descriptive`]: Mean, median, variance, standard deviation, min/max of a dataset
//! - [`tally`]: Occurrence counts of discrete values (e.g. highest tile per game)
//! - [`moving_average`]: Mean over the most recent `N` observations
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use sarsa2048_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Counting highest tiles
//!
//! ```
//! use sarsa2048_stats::tally::Tally;
//!
//! let tally = Tally::from_values([256, 512, 256, 1024]);
//! assert_eq!(tally.count(&256), 2);
//! ```
//!
//! ## Tracking recent episode lengths
//!
//! ```
//! use sarsa2048_stats::moving_average::MovingAverage;
//!
//! let mut avg = MovingAverage::new(2);
//! avg.push(10.0);
//! avg.push(20.0);
//! avg.push(30.0);
//! assert_eq!(avg.mean(), Some(25.0));
//! ```

pub mod descriptive;
pub mod moving_average;
pub mod tally;

//! Simulator to evaluate BER and BLER performance of a convolutional code with hard-decision
//! Viterbi decoding over a BPSK-AWGN channel

use std::fs::File;
use std::io::BufWriter;

use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{utils, Error, ViterbiCodec};

/// Parameters for convolutional code simulation over a BPSK-AWGN channel
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct SimParams {
    /// Constraint length of the code
    pub constraint_len: usize,
    /// Generator polynomials of the code
    pub polynomials: Vec<usize>,
    /// Number of information bits per block
    pub num_info_bits_per_block: u32,
    /// Ratio (dB) of symbol energy to noise power spectral density at BPSK-AWGN channel output
    pub es_over_n0_db: f64,
    /// Desired minimum number of block errors
    pub num_block_errors_min: u32,
    /// Number of blocks to be transmitted per run
    pub num_blocks_per_run: u32,
    /// Minimum number of runs of blocks to be simulated
    pub num_runs_min: u32,
    /// Maximum number of runs of blocks to be simulated
    pub num_runs_max: u32,
}

impl std::fmt::Display for SimParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "K = {}, polynomials = [{}], {} info bits/block, Es/N0 = {} dB",
            self.constraint_len,
            self.polynomials.iter().format(", "),
            self.num_info_bits_per_block,
            self.es_over_n0_db
        )
    }
}

/// Results from convolutional code simulation over a BPSK-AWGN channel
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct SimResults {
    /// Simulation parameters
    pub params: SimParams,
    /// Number of blocks transmitted
    pub num_blocks: u32,
    /// Number of block errors
    pub num_block_errors: u32,
    /// Number of information bits transmitted
    pub num_info_bits: u64,
    /// Number of information bit errors
    pub num_info_bit_errors: u64,
}

impl SimResults {
    /// Returns empty results for a simulation with given parameters.
    fn new(params: SimParams) -> Self {
        Self {
            params,
            num_blocks: 0,
            num_block_errors: 0,
            num_info_bits: 0,
            num_info_bit_errors: 0,
        }
    }

    /// Returns the block error rate.
    #[must_use]
    pub fn block_error_rate(&self) -> f64 {
        if self.num_blocks == 0 {
            0.0
        } else {
            f64::from(self.num_block_errors) / f64::from(self.num_blocks)
        }
    }

    /// Returns the information bit error rate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bit_error_rate(&self) -> f64 {
        if self.num_info_bits == 0 {
            0.0
        } else {
            self.num_info_bit_errors as f64 / self.num_info_bits as f64
        }
    }

    /// Returns the number of runs of blocks simulated so far.
    fn num_runs(&self) -> u32 {
        self.num_blocks / self.params.num_blocks_per_run
    }

    /// Returns whether the desired minimum number of block errors has been seen.
    fn block_error_target_reached(&self) -> bool {
        self.num_block_errors >= self.params.num_block_errors_min
    }
}

/// Runs all given simulations and saves their results to a JSON file.
///
/// Each simulation transmits runs of blocks until the desired minimum number of block errors
/// and the minimum number of runs are both reached, or until the maximum number of runs is
/// reached. The blocks of a run are simulated in parallel (the codec is shared read-only across
/// threads). Progress is reported on `stderr` after each parameter set.
///
/// # Parameters
///
/// - `all_params`: Parameters for each simulation to be run.
///
/// - `json_filename`: Name of the JSON file to which all simulation results must be saved.
///
/// # Returns
///
/// - `all_results`: Results from each simulation, in the order of the given parameters.
///
/// # Errors
///
/// Returns an error if some simulation parameters are invalid (zero blocks per run, zero
/// information bits per block, minimum number of runs exceeding the maximum, or a bad code
/// configuration), or if the results cannot be written to the JSON file.
///
/// # Examples
///
/// ```
/// use viterbi::sim::{self, SimParams};
///
/// let params = SimParams {
///     constraint_len: 3,
///     polynomials: vec![7, 5],
///     num_info_bits_per_block: 40,
///     es_over_n0_db: 4.0,
///     num_block_errors_min: 1,
///     num_blocks_per_run: 10,
///     num_runs_min: 1,
///     num_runs_max: 1,
/// };
/// let json_filename = std::env::temp_dir().join("viterbi_sim_doc.json");
/// let all_results = sim::run_bpsk_awgn_sims(&[params], json_filename.to_str().unwrap())?;
/// assert_eq!(all_results.len(), 1);
/// assert_eq!(all_results[0].num_blocks, 10);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn run_bpsk_awgn_sims(
    all_params: &[SimParams],
    json_filename: &str,
) -> Result<Vec<SimResults>, Error> {
    let mut all_results = Vec::with_capacity(all_params.len());
    for params in all_params {
        let results = run_bpsk_awgn_sim(params)?;
        eprintln!(
            "{params}: BLER = {:.3e}, BER = {:.3e} ({} blocks)",
            results.block_error_rate(),
            results.bit_error_rate(),
            results.num_blocks
        );
        all_results.push(results);
    }
    save_results_to_json_file(&all_results, json_filename)?;
    Ok(all_results)
}

/// Runs a single simulation to completion.
fn run_bpsk_awgn_sim(params: &SimParams) -> Result<SimResults, Error> {
    check_sim_params(params)?;
    let codec = ViterbiCodec::new(params.constraint_len, &params.polynomials)?;
    let mut results = SimResults::new(params.clone());
    while results.num_runs() < params.num_runs_max
        && (results.num_runs() < params.num_runs_min || !results.block_error_target_reached())
    {
        let (num_block_errors, num_info_bit_errors) = (0 .. params.num_blocks_per_run)
            .into_par_iter()
            .map(|_| simulate_block(&codec, params))
            .reduce(|| (0, 0), |acc, block| (acc.0 + block.0, acc.1 + block.1));
        results.num_blocks += params.num_blocks_per_run;
        results.num_block_errors += num_block_errors;
        results.num_info_bits +=
            u64::from(params.num_blocks_per_run) * u64::from(params.num_info_bits_per_block);
        results.num_info_bit_errors += u64::from(num_info_bit_errors);
    }
    Ok(results)
}

/// Transmits one block over the channel and returns its block and bit error counts.
fn simulate_block(codec: &ViterbiCodec, params: &SimParams) -> (u32, u32) {
    // OK to cast `u32` to `usize`: Numbers involved will always be small enough.
    let info_bits = utils::random_bits(params.num_info_bits_per_block as usize);
    let code_bits = codec.encode(&info_bits);
    let received = utils::bpsk_slicer(&utils::bpsk_awgn_channel(&code_bits, params.es_over_n0_db));
    let info_bits_hat = codec.decode(&received);
    let num_bit_errors = utils::error_count(&info_bits_hat, &info_bits);
    // OK to cast `usize` to `u32`: Count is bounded by the block size.
    (u32::from(num_bit_errors > 0), num_bit_errors as u32)
}

/// Checks validity of simulation parameters.
fn check_sim_params(params: &SimParams) -> Result<(), Error> {
    if params.num_info_bits_per_block == 0 {
        return Err(Error::InvalidInput(
            "Number of information bits per block cannot be zero".to_string(),
        ));
    }
    if params.num_blocks_per_run == 0 {
        return Err(Error::InvalidInput(
            "Number of blocks per run cannot be zero".to_string(),
        ));
    }
    if params.num_runs_min > params.num_runs_max {
        return Err(Error::InvalidInput(format!(
            "Minimum number of runs ({}) exceeds maximum number of runs ({})",
            params.num_runs_min, params.num_runs_max
        )));
    }
    Ok(())
}

/// Saves simulation results to a JSON file.
fn save_results_to_json_file(
    all_results: &[SimResults],
    json_filename: &str,
) -> Result<(), Error> {
    let file = File::create(json_filename)?;
    serde_json::to_writer_pretty(BufWriter::new(file), all_results)?;
    Ok(())
}

#[cfg(test)]
mod tests_of_functions {
    use super::*;
    use float_eq::assert_float_eq;

    fn params_for_test() -> SimParams {
        SimParams {
            constraint_len: 3,
            polynomials: vec![7, 5],
            num_info_bits_per_block: 16,
            es_over_n0_db: 10.0,
            num_block_errors_min: 1,
            num_blocks_per_run: 5,
            num_runs_min: 1,
            num_runs_max: 2,
        }
    }

    #[test]
    fn test_sim_params_display() {
        let mut params = params_for_test();
        params.num_info_bits_per_block = 40;
        params.es_over_n0_db = -1.5;
        assert_eq!(
            params.to_string(),
            "K = 3, polynomials = [7, 5], 40 info bits/block, Es/N0 = -1.5 dB"
        );
    }

    #[test]
    fn test_sim_results_rates() {
        let mut results = SimResults::new(params_for_test());
        assert_float_eq!(results.block_error_rate(), 0.0, abs <= 1e-12);
        assert_float_eq!(results.bit_error_rate(), 0.0, abs <= 1e-12);
        results.num_blocks = 100;
        results.num_block_errors = 25;
        results.num_info_bits = 1600;
        results.num_info_bit_errors = 4;
        assert_float_eq!(results.block_error_rate(), 0.25, abs <= 1e-12);
        assert_float_eq!(results.bit_error_rate(), 0.0025, abs <= 1e-12);
    }

    #[test]
    fn test_check_sim_params() {
        // Invalid input
        let mut params = params_for_test();
        params.num_info_bits_per_block = 0;
        assert!(check_sim_params(&params).is_err());
        let mut params = params_for_test();
        params.num_blocks_per_run = 0;
        assert!(check_sim_params(&params).is_err());
        let mut params = params_for_test();
        params.num_runs_min = 3;
        params.num_runs_max = 2;
        assert!(check_sim_params(&params).is_err());
        // Valid input
        assert!(check_sim_params(&params_for_test()).is_ok());
    }

    #[test]
    fn test_simulate_block_at_high_snr() {
        let params = params_for_test();
        let codec = ViterbiCodec::new(params.constraint_len, &params.polynomials).unwrap();
        assert_eq!(simulate_block(&codec, &params), (0, 0));
    }

    #[test]
    fn test_run_bpsk_awgn_sim() {
        // Invalid parameters
        let mut params = params_for_test();
        params.num_blocks_per_run = 0;
        assert!(run_bpsk_awgn_sim(&params).is_err());
        let mut params = params_for_test();
        params.polynomials = vec![7, 8];
        assert!(run_bpsk_awgn_sim(&params).is_err());
        // At high SNR no block errors occur, so the simulation runs to the run cap.
        let params = params_for_test();
        let results = run_bpsk_awgn_sim(&params).unwrap();
        assert_eq!(results.num_blocks, 10);
        assert_eq!(results.num_block_errors, 0);
        assert_eq!(results.num_info_bits, 160);
        // At very low SNR the block error target is met in the first run.
        let mut params = params_for_test();
        params.es_over_n0_db = -10.0;
        params.num_runs_max = 5;
        let results = run_bpsk_awgn_sim(&params).unwrap();
        assert_eq!(results.num_blocks, 5);
        assert!(results.block_error_target_reached());
    }

    #[test]
    fn test_run_bpsk_awgn_sims() {
        let json_filename = std::env::temp_dir().join("viterbi_sim_test.json");
        let json_filename = json_filename.to_str().unwrap();
        let all_params = [params_for_test()];
        let all_results = run_bpsk_awgn_sims(&all_params, json_filename).unwrap();
        assert_eq!(all_results.len(), 1);
        assert_eq!(all_results[0].params, all_params[0]);
        // Saved results must round-trip through the JSON file.
        let file = File::open(json_filename).unwrap();
        let saved_results: Vec<SimResults> = serde_json::from_reader(file).unwrap();
        assert_eq!(saved_results, all_results);
    }
}

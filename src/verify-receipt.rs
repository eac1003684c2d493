//! A simple CLI tool for verifying an election dump and checking that a vote
//! was counted. This uses the server's own verification implementation, and is
//! by definition compatible with the output of our API endpoints.

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufReader;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use rocket::serde::json::serde_json;

use evote_backend::model::{
    api::election::{ElectionDump, VerificationError},
    common::{Address, Nonce, OptionIndex, Receipt},
};

const PROGRAM_NAME: &str = "verify-receipt";

const ABOUT_TEXT: &str = "Verify the integrity of an election, and optionally that a vote was counted.

EXIT CODES:
     0: Verification succeeded.
   255: Ran successfully, but verification failed.
 Other: Error.";

const DUMP_PATH: &str = "DUMP_PATH";
const RECEIPT: &str = "receipt";
const VOTER: &str = "voter";
const OPTION: &str = "option";
const NONCE: &str = "nonce";

const DUMP_PATH_HELP: &str = "The path to a JSON dump of the election,\n\
as returned by `GET /election/dump`";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .arg(
            Arg::new(DUMP_PATH)
                .help(DUMP_PATH_HELP)
                .action(ArgAction::Set)
                .required(true),
        )
        .arg(
            Arg::new(RECEIPT)
                .long(RECEIPT)
                .help("Check that this receipt was accepted")
                .value_parser(value_parser!(Receipt))
                .conflicts_with_all([VOTER, OPTION, NONCE]),
        )
        .arg(
            Arg::new(VOTER)
                .long(VOTER)
                .help("Recompute the receipt for this voter's address")
                .value_parser(value_parser!(Address))
                .requires_all([OPTION, NONCE]),
        )
        .arg(
            Arg::new(OPTION)
                .long(OPTION)
                .help("The candidate index the voter chose")
                .value_parser(value_parser!(OptionIndex))
                .requires_all([VOTER, NONCE]),
        )
        .arg(
            Arg::new(NONCE)
                .long(NONCE)
                .help("The voter's secret nonce, as `0x`-prefixed hex")
                .value_parser(value_parser!(Nonce))
                .requires_all([VOTER, OPTION]),
        )
}

/// Errors that this program may produce.
#[derive(Debug, Eq, PartialEq)]
enum Error {
    /// IO error described by the inner message.
    IO(String),
    /// Failed to decode the JSON dump.
    Format(String),
    /// Verification failed due to the contained reason.
    Verification(VerificationError),
    /// The dump is consistent, but does not contain this receipt.
    NotIncluded(Receipt),
}

/// The results for a particular candidate.
#[derive(Debug, Eq, PartialEq)]
struct FriendlyResults {
    pub candidate_name: String,
    pub votes: u64,
}

impl Display for FriendlyResults {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} vote{}",
            self.candidate_name,
            self.votes,
            if self.votes != 1 { "s" } else { "" }
        )
    }
}

/// Run verification.
fn verify(path: &str, receipt: Option<Receipt>) -> Result<Vec<FriendlyResults>, Error> {
    // Load the file.
    let file = BufReader::new(File::open(path).map_err(|e| Error::IO(e.to_string()))?);
    let dump: ElectionDump =
        serde_json::from_reader(file).map_err(|e| Error::Format(e.to_string()))?;

    // Run verification.
    dump.verify().map_err(Error::Verification)?;
    if let Some(receipt) = receipt {
        if !dump.includes(&receipt) {
            return Err(Error::NotIncluded(receipt));
        }
    }

    // Turn into a list ordered by votes, then name.
    let mut results_list = dump
        .candidates
        .into_iter()
        .zip(dump.tally)
        .map(|(candidate_name, votes)| FriendlyResults {
            candidate_name,
            votes,
        })
        .collect::<Vec<_>>();
    results_list.sort_unstable_by(|a, b| a.candidate_name.cmp(&b.candidate_name));
    results_list.sort_by(|a, b| b.votes.cmp(&a.votes));

    Ok(results_list)
}

/// The receipt to look for, given directly or recomputed from its opening.
fn requested_receipt(args: &ArgMatches) -> Option<Receipt> {
    if let Some(receipt) = args.get_one::<Receipt>(RECEIPT) {
        return Some(*receipt);
    }
    // Clap guarantees these are present together or not at all.
    let voter = args.get_one::<Address>(VOTER)?;
    let option = args.get_one::<OptionIndex>(OPTION)?;
    let nonce = args.get_one::<Nonce>(NONCE)?;
    Some(Receipt::commit(voter, *option, nonce))
}

/// Run verification, report the result, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    let path: &String = args.get_one(DUMP_PATH).unwrap(); // Required argument is guaranteed to be present.
    let receipt = requested_receipt(args);
    match verify(path, receipt) {
        Ok(friendly_results) => {
            println!("Verification succeeded.");
            if let Some(receipt) = receipt {
                println!("Receipt {receipt} was counted.");
            }
            for result in friendly_results {
                println!("{}", result);
            }
            0
        }
        Err(Error::IO(msg)) => {
            println!("IO error: {}", msg);
            1
        }
        Err(Error::Format(msg)) => {
            println!("Invalid JSON: {}", msg);
            1
        }
        Err(Error::Verification(err)) => {
            println!("Verification failed: {}.", err);
            255
        }
        Err(Error::NotIncluded(receipt)) => {
            println!("Verification failed: receipt {receipt} was not counted.");
            255
        }
    }
}

fn main() {
    let args = cli().get_matches();
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    const FIRST_RECEIPT: &str = "0xdb8ebfcc4cda33ee97c5adf228b5acab828e931038e69a1017662899cabd093c";
    const FIRST_VOTER: &str = "0x1111111111111111111111111111111111111101";
    const FIRST_NONCE: &str = "0x0101010101010101010101010101010101010101010101010101010101010101";

    fn results(expected: &[(&str, u64)]) -> Vec<FriendlyResults> {
        expected
            .iter()
            .map(|(name, votes)| FriendlyResults {
                candidate_name: name.to_string(),
                votes: *votes,
            })
            .collect()
    }

    #[test]
    fn verification() {
        // This test actually enters backend code, so enable logging.
        log4rs_test_utils::test_logging::init_logging_once_for(["evote_backend"], None, None);

        let expected_results = results(&[("Bob", 2), ("Alice", 1), ("Charlie", 0)]);
        assert_eq!(verify("example_dumps/election.json", None), Ok(expected_results));

        assert_eq!(
            verify("example_dumps/election_invalid_tally.json", None),
            Err(Error::Verification(VerificationError::Tally {
                tallied: 4,
                receipts: 3
            }))
        );
        assert_eq!(
            verify("example_dumps/election_unlisted_receipt.json", None),
            Err(Error::Verification(VerificationError::UnlistedReceipt {
                seq: 6,
                receipt: Receipt::from_str(
                    "0x80b85eccdf55f00b4d4e0f61f8538d1ea3c92bbee689ea1295b9b59bc4365b8b"
                )
                .unwrap(),
            }))
        );
        assert_eq!(
            verify("example_dumps/election_missing_event.json", None),
            Err(Error::Verification(VerificationError::EventSequence {
                expected: 4,
                found: 5
            }))
        );
    }

    #[test]
    fn receipt_inclusion() {
        let receipt = Receipt::from_str(FIRST_RECEIPT).unwrap();
        assert!(verify("example_dumps/election.json", Some(receipt)).is_ok());

        // The committed receipt is recomputable from its opening.
        let voter = Address::from_str(FIRST_VOTER).unwrap();
        let nonce = Nonce::from_str(FIRST_NONCE).unwrap();
        assert_eq!(Receipt::commit(&voter, 1, &nonce), receipt);

        let stranger = Receipt::commit(&voter, 0, &nonce);
        assert_eq!(
            verify("example_dumps/election.json", Some(stranger)),
            Err(Error::NotIncluded(stranger))
        );
    }

    #[test]
    fn correct_cli_usage() {
        let command_line = [PROGRAM_NAME, "example_dumps/election.json"];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 0);

        let command_line = [
            PROGRAM_NAME,
            "example_dumps/election.json",
            "--receipt",
            FIRST_RECEIPT,
        ];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 0);

        let command_line = [
            PROGRAM_NAME,
            "example_dumps/election.json",
            "--voter",
            FIRST_VOTER,
            "--option",
            "1",
            "--nonce",
            FIRST_NONCE,
        ];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 0);

        // Right voter and nonce, wrong choice.
        let command_line = [
            PROGRAM_NAME,
            "example_dumps/election.json",
            "--voter",
            FIRST_VOTER,
            "--option",
            "2",
            "--nonce",
            FIRST_NONCE,
        ];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 255);

        let command_line = [PROGRAM_NAME, "example_dumps/election_invalid_tally.json"];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 255);

        let command_line = [PROGRAM_NAME, "example_dumps/election_malformed.json"];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 1);

        let command_line = [PROGRAM_NAME, "not a real file"];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 1);
    }

    #[test]
    fn bad_cli_usage() {
        // Something very wrong.
        let command_line = [PROGRAM_NAME, "this", "invocation", "is", "incorrect"];
        cli().try_get_matches_from(command_line).unwrap_err();

        // No options at all.
        let command_line = [PROGRAM_NAME];
        cli().try_get_matches_from(command_line).unwrap_err();

        // Incomplete opening.
        let command_line = [
            PROGRAM_NAME,
            "example_dumps/election.json",
            "--voter",
            FIRST_VOTER,
        ];
        cli().try_get_matches_from(command_line).unwrap_err();

        // Both a receipt and an opening.
        let command_line = [
            PROGRAM_NAME,
            "example_dumps/election.json",
            "--receipt",
            FIRST_RECEIPT,
            "--voter",
            FIRST_VOTER,
            "--option",
            "1",
            "--nonce",
            FIRST_NONCE,
        ];
        cli().try_get_matches_from(command_line).unwrap_err();

        // Not hex.
        let command_line = [
            PROGRAM_NAME,
            "example_dumps/election.json",
            "--receipt",
            "0xnothex",
        ];
        cli().try_get_matches_from(command_line).unwrap_err();
    }
}

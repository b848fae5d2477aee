use cmdlink_cop1::Clcw;

use crate::cmd::ClcwArgs;
use crate::exit::{hex_error, CliError, CliResult, SUCCESS, USAGE};
use crate::input::parse_hex;
use crate::output::{print_clcw, OutputFormat};

pub fn run(args: ClcwArgs, format: OutputFormat) -> CliResult<i32> {
    let clcw = parse_clcw(&args.word)?;
    print_clcw(&clcw, format);
    Ok(SUCCESS)
}

fn parse_clcw(text: &str) -> CliResult<Clcw> {
    let bytes = parse_hex(text).map_err(|err| hex_error("invalid CLCW", err))?;
    let octets: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
        CliError::new(
            USAGE,
            format!("invalid CLCW: expected 4 octets, got {}", bytes.len()),
        )
    })?;
    Ok(Clcw::from_bytes(octets))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_packed_word() {
        let clcw = parse_clcw("0x01 08 20 10").unwrap();
        assert_eq!(clcw.vc_id(), 2);
        assert!(clcw.lockout());
        assert_eq!(clcw.report(), 0x10);
    }

    #[test]
    fn wrong_length_is_usage() {
        assert_eq!(parse_clcw("010800").unwrap_err().code, USAGE);
        assert_eq!(parse_clcw("zz").unwrap_err().code, USAGE);
    }
}

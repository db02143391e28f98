/* src/transfer/parse.rs */

//!
//! Lenient text-to-number parsing for hand-edited option files.
//!
//! Parsing never fails: like C's `strtoll`, it reads as many leading digits
//! as it can and yields `0` when there are none.

/// Parses an integer, in hex when the text looks like `0x...`.
///
/// Values beyond 32 bits wrap, so `0xFFFFFFFF` reads as `-1`.
pub fn parse_int(text: &str) -> i32 {
	let text = text.trim_start();
	let radix = if text.as_bytes().get(1).is_some_and(|b| *b == b'x' || *b == b'X') {
		16
	} else {
		10
	};
	leading_integer(text, radix) as u32 as i32
}

/// Parses a bool: any nonzero leading integer is true. `true`/`false` are
/// accepted as well.
pub fn parse_bool(text: &str) -> bool {
	let text = text.trim();
	if text.eq_ignore_ascii_case("true") {
		return true;
	}
	if text.eq_ignore_ascii_case("false") {
		return false;
	}
	leading_integer(text, 10) != 0
}

fn leading_integer(text: &str, radix: u32) -> i64 {
	let mut rest = text.trim_start();
	let negative = match rest.as_bytes().first() {
		Some(b'-') => {
			rest = &rest[1..];
			true
		}
		Some(b'+') => {
			rest = &rest[1..];
			false
		}
		_ => false,
	};
	if radix == 16 {
		rest = rest
			.strip_prefix("0x")
			.or_else(|| rest.strip_prefix("0X"))
			.unwrap_or(rest);
	}

	let mut value: i64 = 0;
	for digit in rest.chars().map_while(|c| c.to_digit(radix)) {
		value = value
			.saturating_mul(i64::from(radix))
			.saturating_add(i64::from(digit));
	}
	if negative { value.saturating_neg() } else { value }
}

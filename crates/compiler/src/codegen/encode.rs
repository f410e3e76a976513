use num_bigint::Sign;
use zkpc_core::Literal;

/// Encodes a literal as `0x`-prefixed lower-case hex.
///
/// Numbers are written little-endian, strings as their UTF-8 bytes. Lists and negative numbers have
/// no encoding.
pub fn encode_literal(literal: &Literal) -> Option<String> {
	let bytes = match literal {
		Literal::Integer(n) | Literal::Hex(n) => {
			if n.sign() == Sign::Minus {
				return None;
			}
			n.magnitude().to_bytes_le()
		}
		Literal::String(s) => s.as_bytes().to_vec(),
		Literal::List(_) => return None,
	};
	Some(format!("0x{}", hex::encode(bytes)))
}

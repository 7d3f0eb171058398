//! Decodificador de payloads a texto legible.
//!
//! Reglas:
//! 1. Lista vacía o ausente -> `None`.
//! 2. Un elemento -> sus bytes en texto, o `"null"` si no trae `data`.
//! 3. Varios elementos -> cada uno según (2), unidos como `[a, b]`.
//!
//! Se aceptan los alfabetos estándar y URL-safe (`-`/`_`). Un base64
//! inválido en ambos se trata como bytes ausentes (`"null"`). Bytes que no
//! son UTF-8 se reemplazan con U+FFFD.
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use log::warn;

use crate::constants::NULL_PAYLOAD;
use crate::event::{Payload, Payloads};

const PADDING_INDIFFERENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// Tolera payloads con o sin padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, PADDING_INDIFFERENT);
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, PADDING_INDIFFERENT);

pub fn decode_payloads(payloads: Option<&[Payload]>) -> Option<String> {
    match payloads {
        None | Some([]) => None,
        Some([single]) => Some(decode_one(single)),
        Some(many) => {
            let parts: Vec<String> = many.iter().map(decode_one).collect();
            Some(format!("[{}]", parts.join(", ")))
        }
    }
}

/// Atajo para los contenedores `{ payloads: [...] }` opcionales de los
/// atributos.
pub fn decode(container: Option<&Payloads>) -> Option<String> {
    decode_payloads(container.map(|p| p.payloads.as_slice()))
}

fn decode_one(payload: &Payload) -> String {
    let Some(data) = payload.data.as_deref().filter(|d| !d.is_empty()) else {
        return NULL_PAYLOAD.to_string();
    };
    let data = data.trim();
    match LENIENT.decode(data).or_else(|e| LENIENT_URL_SAFE.decode(data).map_err(|_| e)) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!("undecodable payload data ({e}); treating as absent");
            NULL_PAYLOAD.to_string()
        }
    }
}

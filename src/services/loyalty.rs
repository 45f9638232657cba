// src/services/loyalty.rs
//
// Decide se um item vendido conta como "garrafão de 20L qualificado" para o
// programa de fidelidade. A regra é derivada do texto livre de nome e
// categoria do produto, e é um contrato de compatibilidade: marcas, tokens de
// tamanho e a normalização são fixos. Renomear um produto tirando a marca ou
// o "20L" do texto faz ele parar de pontuar, e isso é o comportamento
// esperado. Não adicionar fuzzy matching aqui.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

const ALLOWED_BRANDS: [&str; 6] = ["GAMBOA", "INDAIA", "ITAGY", "ITAGI", "JORDAO", "MAIORCA"];

const SIZE_TOKENS: [&str; 4] = ["20L", "20 L", "20LITROS", "20 LITROS"];

/// Decompõe em NFD, descarta as marcas diacríticas e sobe para maiúsculas.
/// "Água Indaiá" -> "AGUA INDAIA".
fn normalize(input: &str) -> String {
    input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_uppercase()
}

/// Um item qualifica se, no texto normalizado de nome + categoria:
/// marca permitida E token "AGUA" E algum token de tamanho 20L.
pub fn is_qualifying_water(product_name: &str, product_category: &str) -> bool {
    let search = normalize(&format!("{} {}", product_name, product_category));

    let is_allowed_brand = ALLOWED_BRANDS.iter().any(|brand| search.contains(brand));
    let has_agua = search.contains("AGUA");
    let has_20l = SIZE_TOKENS.iter().any(|token| search.contains(token));

    is_allowed_brand && has_agua && has_20l
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garrafao_de_marca_permitida_qualifica() {
        assert!(is_qualifying_water("Água Mineral 20L Indaiá", "Água 20L"));
    }

    #[test]
    fn refrigerante_nao_qualifica() {
        assert!(!is_qualifying_water("Refrigerante Cola 2L", "Refrigerante"));
    }

    #[test]
    fn tamanho_por_extenso_qualifica() {
        assert!(is_qualifying_water("Água 20 Litros Gamboa", ""));
    }

    #[test]
    fn marca_fora_da_lista_nao_qualifica() {
        assert!(!is_qualifying_water("Água 20L MarcaX", ""));
    }

    #[test]
    fn insensivel_a_caixa_e_acento() {
        assert!(is_qualifying_water("água mineral 20l jordão", ""));
        assert!(is_qualifying_water("AGUA MINERAL 20L JORDAO", ""));
    }

    #[test]
    fn exige_as_tres_condicoes_juntas() {
        // Marca + tamanho sem "água" não basta.
        assert!(!is_qualifying_water("Garrafão 20L Indaiá", ""));
        // Marca + água sem tamanho não basta.
        assert!(!is_qualifying_water("Água Mineral Indaiá 500ml", ""));
    }

    #[test]
    fn categoria_tambem_conta_na_busca() {
        // O nome sozinho não qualifica, mas a categoria completa o texto.
        assert!(is_qualifying_water("Garrafão Itagy", "Água 20L"));
    }
}

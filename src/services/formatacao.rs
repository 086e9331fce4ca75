// src/services/formatacao.rs
//! Formatação para exibição de dados de participantes.
//!
//! Nada aqui valida a entrada: texto inesperado gera saída parcial ou
//! inalterada, nunca erro.

/// Máximo de dígitos considerados para CPF e telefone.
const MAX_DIGITOS: usize = 11;

const PRIMEIRO_HORARIO: u32 = 8 * 60;
const ULTIMO_HORARIO: u32 = 22 * 60;
const INTERVALO_MINUTOS: u32 = 30;

/// "2024-03-07" -> "07/03/2024". Segmentos além do terceiro são ignorados.
pub fn formatar_data(data: &str) -> String {
    let mut partes = data.split('-');
    let ano = partes.next().unwrap_or_default();
    let mes = partes.next().unwrap_or_default();
    let dia = partes.next().unwrap_or_default();
    format!("{}/{}/{}", dia, mes, ano)
}

fn so_digitos(valor: &str) -> String {
    valor.chars().filter(char::is_ascii_digit).take(MAX_DIGITOS).collect()
}

/// Máscara `###.###.###-##`, aplicada à medida que há dígitos.
pub fn formatar_cpf(valor: &str) -> String {
    let d = so_digitos(valor);
    match d.len() {
        0..=3 => d,
        4..=6 => format!("{}.{}", &d[..3], &d[3..]),
        7..=9 => format!("{}.{}.{}", &d[..3], &d[3..6], &d[6..]),
        _ => format!("{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..]),
    }
}

/// Máscara `(DD) NNNNN-NNNN`, aplicada à medida que há dígitos.
pub fn formatar_telefone(valor: &str) -> String {
    let d = so_digitos(valor);
    match d.len() {
        0 => String::new(),
        1..=2 => format!("({}", d),
        3..=7 => format!("({}) {}", &d[..2], &d[2..]),
        _ => format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..]),
    }
}

/// Horários de meia em meia hora, das 08:00 às 22:00 inclusive.
/// Cada chamada devolve um iterador novo.
pub fn horarios() -> Horarios {
    Horarios { proximo: PRIMEIRO_HORARIO }
}

#[derive(Debug, Clone)]
pub struct Horarios {
    proximo: u32, // minutos desde a meia-noite
}

impl Iterator for Horarios {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.proximo > ULTIMO_HORARIO {
            return None;
        }
        let atual = self.proximo;
        self.proximo += INTERVALO_MINUTOS;
        Some(format!("{:02}:{:02}", atual / 60, atual % 60))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let restantes = if self.proximo > ULTIMO_HORARIO {
            0
        } else {
            ((ULTIMO_HORARIO - self.proximo) / INTERVALO_MINUTOS + 1) as usize
        };
        (restantes, Some(restantes))
    }
}

impl ExactSizeIterator for Horarios {}

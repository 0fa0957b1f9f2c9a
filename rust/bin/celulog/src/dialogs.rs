//! Confirmation copy for the four mutating actions.
//!
//! The wording is product copy and shows up verbatim in the terminal;
//! keep it in Portuguese.

use celulog_confirm::{ConfirmOptions, Tone};

pub fn register() -> ConfirmOptions {
    ConfirmOptions::new("Confirmar registro")
        .description("Tem certeza que deseja adicionar um novo registro?")
        .labels("Sim, registrar", "Cancelar")
}

pub fn update() -> ConfirmOptions {
    ConfirmOptions::new("Confirmar alteração")
        .description(
            "Você está prestes a alterar este registro. Após a alteração, não será possível desfazer.",
        )
        .labels("Alterar", "Cancelar")
}

pub fn delete() -> ConfirmOptions {
    ConfirmOptions::new("Confirmar exclusão")
        .description(
            "Tem certeza de que deseja remover este registro? Essa ação não poderá ser desfeita e apagará permanentemente as informações do sistema.",
        )
        .labels("Sim, remover", "Cancelar")
        .tone(Tone::Destructive)
}

pub fn download() -> ConfirmOptions {
    ConfirmOptions::new("Download")
        .description("Tem certeza que deseja baixar o arquivo em .xlsx")
        .labels("Baixar", "Cancelar")
}

// src/middleware/access.rs
//
// Tabela de capacidades por papel, consultada uma vez na entrada de cada
// handler em vez de espalhar comparações de string de papel pelas telas.
// admin faz tudo; entregador só enxerga pedidos e atualiza entrega;
// pending não acessa nada até ser promovido.

use crate::{
    common::error::AppError,
    models::auth::{Profile, Role},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ViewDashboard,
    ManageCatalog,
    ManageCustomers,
    ViewOrders,
    UpdateDeliveryStatus,
    UpdatePaymentStatus,
    PlaceOrders,
    ManageFinance,
    ManageTeam,
}

impl Capability {
    fn describe(self) -> &'static str {
        match self {
            Capability::ViewDashboard => "ver o painel",
            Capability::ManageCatalog => "gerenciar produtos e estoque",
            Capability::ManageCustomers => "gerenciar clientes",
            Capability::ViewOrders => "ver pedidos",
            Capability::UpdateDeliveryStatus => "atualizar status de entrega",
            Capability::UpdatePaymentStatus => "alterar status de pagamento",
            Capability::PlaceOrders => "lançar pedidos",
            Capability::ManageFinance => "acessar o financeiro",
            Capability::ManageTeam => "gerenciar a equipe",
        }
    }
}

pub fn allowed(role: Role, capability: Capability) -> bool {
    match role {
        Role::Admin => true,
        Role::Entregador => matches!(
            capability,
            Capability::ViewOrders | Capability::UpdateDeliveryStatus
        ),
        Role::Pending => false,
    }
}

/// Guarda de entrada dos handlers: ou passa, ou devolve 403 com a ação
/// negada por extenso.
pub fn require(profile: &Profile, capability: Capability) -> Result<(), AppError> {
    if allowed(profile.role, capability) {
        return Ok(());
    }
    Err(AppError::Forbidden(format!(
        "Seu papel não permite {}.",
        capability.describe()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Capability; 9] = [
        Capability::ViewDashboard,
        Capability::ManageCatalog,
        Capability::ManageCustomers,
        Capability::ViewOrders,
        Capability::UpdateDeliveryStatus,
        Capability::UpdatePaymentStatus,
        Capability::PlaceOrders,
        Capability::ManageFinance,
        Capability::ManageTeam,
    ];

    #[test]
    fn admin_pode_tudo() {
        assert!(ALL.iter().all(|c| allowed(Role::Admin, *c)));
    }

    #[test]
    fn entregador_so_ve_pedidos_e_atualiza_entrega() {
        for c in ALL {
            let expected = matches!(c, Capability::ViewOrders | Capability::UpdateDeliveryStatus);
            assert_eq!(allowed(Role::Entregador, c), expected, "{:?}", c);
        }
        // Em particular, entregador NÃO altera pagamento.
        assert!(!allowed(Role::Entregador, Capability::UpdatePaymentStatus));
    }

    #[test]
    fn pending_nao_acessa_nada() {
        assert!(ALL.iter().all(|c| !allowed(Role::Pending, *c)));
    }
}

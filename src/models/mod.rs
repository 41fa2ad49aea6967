// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - users : Comptes clients et administrateurs
//   - products : Catalogue de la boutique
//   - orders : Commandes + machine à états du statut
//   - notifications : Notifications in-app par utilisateur
//   - updates : Annonces admin diffusées à tous
//   - support_messages : Fils de support client
//   - dto : Data Transfer Objects pour les requêtes/réponses API
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - orders.product_id est une colonne simple, pas une FK: la
//     suppression d'un produit ne cascade pas sur les commandes
//
// ============================================================================

pub mod dto;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod support_messages;
pub mod updates;
pub mod users;

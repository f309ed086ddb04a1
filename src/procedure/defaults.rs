//! Built-in default step catalog.
//!
//! Flat, non-personalized step lists keyed by exact `(country, visa_type)`
//! pairs, plus a generic list for anything unmatched. New destinations are
//! added by extending the table, not by branching code.

use super::{ProofType, StepBlueprint};

pub struct DefaultStep {
    pub title: &'static str,
    pub description: &'static str,
    pub requires_proof: bool,
    pub proof_type: Option<ProofType>,
}

const FRANCE_STUDENT: &[DefaultStep] = &[
    DefaultStep {
        title: "Création du compte Campus France",
        description: "Créez votre compte sur le site Campus France et remplissez votre dossier en \
                      ligne. Vous devrez fournir vos informations personnelles, académiques et \
                      votre projet d'études.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
    },
    DefaultStep {
        title: "Préparation des documents académiques",
        description: "Rassemblez tous vos diplômes, relevés de notes et attestations de réussite. \
                      Faites-les traduire si nécessaire et obtenez les certifications requises.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Obtention de l'attestation d'acceptation",
        description: "Recevez votre lettre d'acceptation de l'université française et \
                      téléchargez-la sur votre compte Campus France.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Justificatif de ressources financières",
        description: "Préparez les documents prouvant que vous disposez d'au moins 615€ par mois \
                      pour votre séjour en France (relevés bancaires, attestation de prise en \
                      charge, etc.).",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Entretien Campus France",
        description: "Prenez rendez-vous et passez votre entretien pédagogique avec Campus \
                      France. Préparez-vous à expliquer votre projet d'études et vos motivations.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
    },
    DefaultStep {
        title: "Demande de visa",
        description: "Une fois validé par Campus France, prenez rendez-vous au consulat de France \
                      et déposez votre demande de visa avec tous les documents requis.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
    },
    DefaultStep {
        title: "Suivi du dossier",
        description: "Suivez l'avancement de votre demande de visa en ligne et attendez la \
                      décision. Le délai de traitement est généralement de 2 à 4 semaines.",
        requires_proof: false,
        proof_type: None,
    },
];

const CANADA_STUDENT: &[DefaultStep] = &[
    DefaultStep {
        title: "Lettre d'acceptation d'une université",
        description: "Obtenez une lettre d'acceptation d'un établissement d'enseignement désigné \
                      (EED) canadien.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Preuve de fonds suffisants",
        description: "Démontrez que vous disposez des fonds nécessaires pour payer vos frais de \
                      scolarité et subvenir à vos besoins au Canada.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Test de langue",
        description: "Passez un test de langue reconnu (IELTS, TEF Canada) et obtenez le score \
                      requis par votre programme.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
    },
    DefaultStep {
        title: "Examen médical",
        description: "Passez un examen médical auprès d'un médecin agréé par IRCC si requis pour \
                      votre pays d'origine.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
    },
    DefaultStep {
        title: "Création du compte IRCC",
        description: "Créez votre compte sur le portail d'Immigration, Réfugiés et Citoyenneté \
                      Canada (IRCC) et remplissez la demande en ligne.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
    },
    DefaultStep {
        title: "Soumission de la demande",
        description: "Téléchargez tous les documents requis et payez les frais de traitement \
                      (150 CAD).",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
    },
    DefaultStep {
        title: "Données biométriques",
        description: "Prenez rendez-vous dans un centre de collecte de données biométriques et \
                      fournissez vos empreintes digitales et photo.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
    },
    DefaultStep {
        title: "Suivi et décision",
        description: "Suivez votre demande en ligne. Le délai de traitement varie selon votre \
                      pays (généralement 3-12 semaines).",
        requires_proof: false,
        proof_type: None,
    },
];

const BELGIQUE_STUDENT: &[DefaultStep] = &[
    DefaultStep {
        title: "Préinscription universitaire",
        description: "Déposez votre demande d'admission auprès d'une université ou haute école \
                      belge et obtenez l'attestation de préinscription.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Équivalence de diplômes",
        description: "Introduisez votre demande d'équivalence de diplôme auprès de la Fédération \
                      Wallonie-Bruxelles avant la date limite du 15 juillet.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Preuve de moyens de subsistance",
        description: "Constituez la preuve que vous disposez d'environ 700€ par mois : prise en \
                      charge (annexe 32), bourse ou compte bloqué.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Certificat médical et extrait de casier judiciaire",
        description: "Obtenez le certificat médical délivré par un médecin agréé et, si vous avez \
                      plus de 21 ans, un extrait de casier judiciaire récent.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Demande de visa D",
        description: "Déposez votre demande de visa long séjour (type D) auprès de l'ambassade de \
                      Belgique avec l'ensemble du dossier.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
    },
    DefaultStep {
        title: "Suivi du dossier",
        description: "Suivez l'avancement de votre demande et attendez la décision de l'Office \
                      des Étrangers.",
        requires_proof: false,
        proof_type: None,
    },
];

const ALLEMAGNE_STUDENT: &[DefaultStep] = &[
    DefaultStep {
        title: "Admission dans une université allemande",
        description: "Candidatez via uni-assist ou directement auprès de l'université et obtenez \
                      votre lettre d'admission (Zulassungsbescheid).",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Ouverture du compte bloqué",
        description: "Ouvrez un compte bloqué (Sperrkonto) avec le montant minimum exigé \
                      (11 208 EUR) et obtenez l'attestation de blocage.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Assurance santé",
        description: "Souscrivez une assurance maladie reconnue en Allemagne et conservez \
                      l'attestation de couverture.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Preuve de compétences linguistiques",
        description: "Fournissez un certificat de langue allemande (TestDaF, DSH) ou anglaise \
                      selon la langue de votre programme.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
    },
    DefaultStep {
        title: "Demande de visa étudiant",
        description: "Prenez rendez-vous à l'ambassade d'Allemagne et déposez votre demande de \
                      visa national avec le dossier complet.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
    },
    DefaultStep {
        title: "Suivi du dossier",
        description: "Suivez votre demande ; le traitement prend généralement de 6 à 12 semaines.",
        requires_proof: false,
        proof_type: None,
    },
];

const USA_STUDENT: &[DefaultStep] = &[
    DefaultStep {
        title: "Obtention du formulaire I-20",
        description: "Faites-vous admettre dans une université américaine certifiée SEVP et \
                      recevez votre formulaire I-20.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Paiement des frais SEVIS",
        description: "Payez les frais SEVIS I-901 (350 USD) en ligne et conservez le reçu de \
                      paiement.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
    },
    DefaultStep {
        title: "Formulaire DS-160",
        description: "Remplissez le formulaire de demande de visa DS-160 en ligne et imprimez la \
                      page de confirmation.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
    },
    DefaultStep {
        title: "Preuve de fonds",
        description: "Préparez les justificatifs financiers couvrant les frais de scolarité et de \
                      séjour de la première année.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Entretien à l'ambassade",
        description: "Prenez rendez-vous et passez l'entretien consulaire avec votre passeport, \
                      le I-20 et vos justificatifs.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
    },
    DefaultStep {
        title: "Suivi et décision",
        description: "Suivez le traitement de votre demande ; les délais varient de 3 à 8 mois \
                      selon la période.",
        requires_proof: false,
        proof_type: None,
    },
];

const LUXEMBOURG_STUDENT: &[DefaultStep] = &[
    DefaultStep {
        title: "Admission à l'Université du Luxembourg",
        description: "Obtenez votre lettre d'admission dans un programme d'enseignement supérieur \
                      luxembourgeois.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Autorisation de séjour temporaire",
        description: "Introduisez la demande d'autorisation de séjour temporaire auprès de la \
                      Direction de l'immigration avant votre arrivée.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Preuve de ressources",
        description: "Justifiez de ressources suffisantes pour couvrir vos frais de séjour \
                      (attestation bancaire ou prise en charge).",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Demande de visa D",
        description: "Une fois l'autorisation obtenue, demandez le visa long séjour (type D) \
                      auprès de l'ambassade compétente.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
    },
    DefaultStep {
        title: "Suivi du dossier",
        description: "Suivez votre demande et préparez les démarches d'arrivée (déclaration \
                      d'arrivée, titre de séjour).",
        requires_proof: false,
        proof_type: None,
    },
];

const SUISSE_STUDENT: &[DefaultStep] = &[
    DefaultStep {
        title: "Admission dans une haute école suisse",
        description: "Obtenez votre confirmation d'admission dans une université ou haute école \
                      spécialisée suisse.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Preuve de moyens financiers",
        description: "Justifiez de moyens financiers suffisants (environ 21 000 CHF par an) par \
                      attestation bancaire ou garantie.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Plan d'études et lettre de motivation",
        description: "Rédigez un plan d'études précisant le cursus visé et votre engagement à \
                      quitter la Suisse au terme de la formation.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Demande de visa D",
        description: "Déposez la demande de visa national auprès de la représentation suisse de \
                      votre pays de résidence.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
    },
    DefaultStep {
        title: "Suivi cantonal",
        description: "Attendez la décision de l'autorité cantonale des migrations compétente pour \
                      votre lieu d'études.",
        requires_proof: false,
        proof_type: None,
    },
];

/// Generic fallback for any unmatched `(country, visa_type)` pair.
const GENERIC_STEPS: &[DefaultStep] = &[
    DefaultStep {
        title: "Préparation des documents",
        description: "Rassemblez tous les documents nécessaires pour votre demande de visa.",
        requires_proof: false,
        proof_type: None,
    },
    DefaultStep {
        title: "Création du dossier en ligne",
        description: "Créez votre compte sur la plateforme officielle et remplissez le formulaire \
                      de demande.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
    },
    DefaultStep {
        title: "Soumission de la demande",
        description: "Soumettez votre demande complète avec tous les documents requis.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
    },
    DefaultStep {
        title: "Paiement des frais",
        description: "Payez les frais de traitement de votre demande de visa.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
    },
    DefaultStep {
        title: "Suivi du dossier",
        description: "Suivez l'avancement de votre demande et attendez la décision.",
        requires_proof: false,
        proof_type: None,
    },
];

/// Lookup table. Extend here to support a new destination.
const DEFAULT_CATALOG: &[(&str, &str, &[DefaultStep])] = &[
    ("France", "STUDENT", FRANCE_STUDENT),
    ("Canada", "STUDENT", CANADA_STUDENT),
    ("Belgique", "STUDENT", BELGIQUE_STUDENT),
    ("Allemagne", "STUDENT", ALLEMAGNE_STUDENT),
    ("États-Unis", "STUDENT", USA_STUDENT),
    ("Luxembourg", "STUDENT", LUXEMBOURG_STUDENT),
    ("Suisse", "STUDENT", SUISSE_STUDENT),
];

/// Resolve the default step list for a pair, falling back to the generic
/// list. Never fails.
pub fn resolve_default(country: &str, visa_type: &str) -> &'static [DefaultStep] {
    DEFAULT_CATALOG
        .iter()
        .find(|(c, v, _)| *c == country && *v == visa_type)
        .map(|(_, _, steps)| *steps)
        .unwrap_or(GENERIC_STEPS)
}

/// Number the default list into insertable blueprints, starting at 1.
pub fn to_blueprints(steps: &[DefaultStep]) -> Vec<StepBlueprint> {
    steps
        .iter()
        .enumerate()
        .map(|(i, s)| StepBlueprint {
            step_number: (i + 1) as i64,
            title: s.title.to_string(),
            description: s.description.to_string(),
            requires_proof: s.requires_proof,
            proof_type: s.proof_type,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_seven_destinations() {
        assert_eq!(DEFAULT_CATALOG.len(), 7);
    }

    #[test]
    fn test_known_pair_resolves() {
        let steps = resolve_default("France", "STUDENT");
        assert_eq!(steps.len(), 7);
        assert_eq!(steps[0].title, "Création du compte Campus France");
    }

    #[test]
    fn test_unknown_pair_gets_generic() {
        let steps = resolve_default("Atlantide", "TOURIST");
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0].title, "Préparation des documents");
        // Visa type mismatch also falls back.
        let steps = resolve_default("France", "WORK");
        assert_eq!(steps.len(), 5);
    }

    #[test]
    fn test_blueprints_are_numbered_from_one() {
        let blueprints = to_blueprints(resolve_default("Canada", "STUDENT"));
        let numbers: Vec<i64> = blueprints.iter().map(|b| b.step_number).collect();
        assert_eq!(numbers, (1..=8).collect::<Vec<i64>>());
    }
}

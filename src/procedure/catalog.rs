//! Phase catalog for the personalized step generator.
//!
//! Immutable data tables keyed by exact `(country, visa_type)` pairs. Each
//! entry is an ordered list of phases; a phase that represents a
//! language-certification requirement carries the target language code in
//! `language_requirement` so the generator can apply the certificate
//! predicate uniformly. Adding a destination means adding a table entry.

use super::ProofType;

#[derive(Debug)]
pub struct SubStepSpec {
    pub title: &'static str,
    pub description: &'static str,
    pub requires_proof: bool,
    pub proof_type: Option<ProofType>,
}

#[derive(Debug)]
pub struct PhaseSpec {
    pub title: &'static str,
    pub description: &'static str,
    pub requires_proof: bool,
    pub proof_type: Option<ProofType>,
    /// Language code when the phase is a language-certification requirement.
    pub language_requirement: Option<&'static str>,
    pub sub_steps: &'static [SubStepSpec],
}

/// The three instructional sub-steps every unvalidated language phase keeps.
macro_rules! language_sub_steps {
    ($test:literal) => {
        &[
            SubStepSpec {
                title: concat!("Inscription au test ", $test),
                description: concat!(
                    "Inscrivez-vous à une session officielle du test ",
                    $test,
                    " dans un centre agréé proche de chez vous."
                ),
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
            SubStepSpec {
                title: "Préparation au test",
                description: "Préparez-vous avec les annales et des sessions blanches jusqu'au \
                              niveau exigé par votre programme.",
                requires_proof: false,
                proof_type: None,
            },
            SubStepSpec {
                title: "Passage du test et obtention du certificat",
                description: concat!(
                    "Passez le test ",
                    $test,
                    " et téléchargez votre attestation de résultats."
                ),
                requires_proof: true,
                proof_type: Some(ProofType::Certificate),
            },
        ]
    };
}

// ─── France ──────────────────────────────────────────────────────────────────

const FRANCE_STUDENT: &[PhaseSpec] = &[
    PhaseSpec {
        title: "Phase 1 : Inscription Campus France",
        description: "Constituez votre dossier sur la plateforme Campus France, point d'entrée \
                      obligatoire de toute candidature étudiante.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Création du compte Campus France",
                description: "Créez votre compte sur le site Campus France de votre pays et \
                              renseignez vos informations personnelles.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
            SubStepSpec {
                title: "Saisie du dossier pédagogique",
                description: "Renseignez votre parcours académique et votre projet d'études, puis \
                              sélectionnez vos formations.",
                requires_proof: false,
                proof_type: None,
            },
            SubStepSpec {
                title: "Soumission du dossier",
                description: "Soumettez le dossier complet et payez les frais Campus France.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 2 : Dossier académique",
        description: "Rassemblez et faites certifier l'ensemble de vos documents académiques.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Collecte des diplômes et relevés",
                description: "Rassemblez diplômes, relevés de notes et attestations de réussite \
                              de tout votre parcours.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
            SubStepSpec {
                title: "Traductions certifiées",
                description: "Faites traduire les documents non francophones par un traducteur \
                              assermenté.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 3 : Certification de français",
        description: "Justifiez votre niveau de français par un test reconnu (TCF, DELF ou DALF) \
                      exigé par les établissements français.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
        language_requirement: Some("FRENCH"),
        sub_steps: language_sub_steps!("TCF/DELF"),
    },
    PhaseSpec {
        title: "Phase 4 : Financement et logement",
        description: "Prouvez vos ressources et préparez votre hébergement en France.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Justificatif de ressources",
                description: "Réunissez les preuves d'au moins 615€ par mois : relevés bancaires, \
                              attestation de prise en charge ou bourse.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
            SubStepSpec {
                title: "Attestation d'hébergement",
                description: "Obtenez une attestation de logement ou une réservation pour vos \
                              premiers mois.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 5 : Demande de visa",
        description: "Finalisez la procédure consulaire après validation de votre dossier Campus \
                      France.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Entretien Campus France",
                description: "Passez l'entretien pédagogique et obtenez l'attestation Campus \
                              France.",
                requires_proof: true,
                proof_type: Some(ProofType::Certificate),
            },
            SubStepSpec {
                title: "Dépôt de la demande de visa",
                description: "Prenez rendez-vous au consulat et déposez votre demande de visa \
                              long séjour étudiant.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
            SubStepSpec {
                title: "Suivi de la décision",
                description: "Suivez l'avancement en ligne ; le traitement prend généralement de \
                              2 à 4 semaines.",
                requires_proof: false,
                proof_type: None,
            },
        ],
    },
];

// ─── Canada ──────────────────────────────────────────────────────────────────

const CANADA_STUDENT: &[PhaseSpec] = &[
    PhaseSpec {
        title: "Phase 1 : Admission dans un EED",
        description: "Obtenez une lettre d'acceptation d'un établissement d'enseignement désigné \
                      canadien.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Choix des programmes",
                description: "Identifiez les établissements désignés (EED) et les programmes \
                              correspondant à votre parcours.",
                requires_proof: false,
                proof_type: None,
            },
            SubStepSpec {
                title: "Candidature et lettre d'acceptation",
                description: "Déposez vos candidatures et obtenez la lettre d'acceptation \
                              officielle.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 2 : Preuve de fonds",
        description: "Démontrez votre capacité à financer vos frais de scolarité et de séjour.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Relevés bancaires et garanties",
                description: "Rassemblez relevés bancaires, attestations de bourse ou lettre de \
                              prise en charge.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
            SubStepSpec {
                title: "Certificat de placement garanti (si requis)",
                description: "Pour le volet direct des études, souscrivez un CPG auprès d'une \
                              banque participante.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 3 : Certification d'anglais",
        description: "Justifiez votre niveau d'anglais par un test reconnu (IELTS ou TOEFL) \
                      exigé par votre programme.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
        language_requirement: Some("ENGLISH"),
        sub_steps: language_sub_steps!("IELTS"),
    },
    PhaseSpec {
        title: "Phase 4 : Biométrie et examen médical",
        description: "Complétez les contrôles exigés par IRCC avant la décision.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Examen médical",
                description: "Passez l'examen auprès d'un médecin agréé par IRCC si requis pour \
                              votre pays.",
                requires_proof: true,
                proof_type: Some(ProofType::Certificate),
            },
            SubStepSpec {
                title: "Données biométriques",
                description: "Fournissez empreintes digitales et photo dans un centre de \
                              collecte.",
                requires_proof: true,
                proof_type: Some(ProofType::Certificate),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 5 : Demande de permis d'études",
        description: "Déposez la demande en ligne sur le portail IRCC et suivez-la jusqu'à la \
                      décision.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Création du compte IRCC",
                description: "Créez votre compte sur le portail IRCC et remplissez la demande en \
                              ligne.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
            SubStepSpec {
                title: "Soumission et paiement",
                description: "Téléversez les documents requis et payez les frais de traitement \
                              (150 CAD).",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
            SubStepSpec {
                title: "Suivi de la décision",
                description: "Suivez votre demande en ligne ; le délai varie généralement de 3 à \
                              12 semaines.",
                requires_proof: false,
                proof_type: None,
            },
        ],
    },
];

// ─── Belgique ────────────────────────────────────────────────────────────────

const BELGIQUE_STUDENT: &[PhaseSpec] = &[
    PhaseSpec {
        title: "Phase 1 : Préinscription universitaire",
        description: "Obtenez l'attestation de préinscription d'une université ou haute école \
                      belge.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Demande d'admission",
                description: "Déposez votre dossier d'admission auprès des établissements visés \
                              avant leur date limite.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
            SubStepSpec {
                title: "Attestation de préinscription",
                description: "Conservez l'attestation délivrée par l'établissement.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 2 : Équivalence de diplômes",
        description: "Faites reconnaître votre diplôme par la Fédération Wallonie-Bruxelles.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Constitution du dossier d'équivalence",
                description: "Réunissez diplôme légalisé, relevés de notes et acte de naissance.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
            SubStepSpec {
                title: "Envoi avant le 15 juillet",
                description: "Envoyez le dossier complet au service des équivalences avant la \
                              date limite.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 3 : Certification de français",
        description: "Justifiez votre maîtrise du français pour les programmes francophones \
                      (DELF ou TCF).",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
        language_requirement: Some("FRENCH"),
        sub_steps: language_sub_steps!("DELF/TCF"),
    },
    PhaseSpec {
        title: "Phase 4 : Moyens de subsistance",
        description: "Prouvez environ 700€ par mois pour la durée de vos études.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Prise en charge ou compte bloqué",
                description: "Faites signer l'annexe 32 par un garant ou constituez un compte \
                              bloqué.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 5 : Demande de visa D",
        description: "Déposez votre demande de visa long séjour auprès de l'ambassade de \
                      Belgique.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Certificat médical et casier judiciaire",
                description: "Obtenez le certificat médical agréé et, si plus de 21 ans, \
                              l'extrait de casier judiciaire.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
            SubStepSpec {
                title: "Dépôt du dossier de visa",
                description: "Déposez le dossier complet et payez les frais ; suivez la décision \
                              de l'Office des Étrangers.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
        ],
    },
];

// ─── Allemagne ───────────────────────────────────────────────────────────────

const ALLEMAGNE_STUDENT: &[PhaseSpec] = &[
    PhaseSpec {
        title: "Phase 1 : Admission universitaire",
        description: "Candidatez via uni-assist ou directement et obtenez votre \
                      Zulassungsbescheid.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Candidature uni-assist",
                description: "Déposez vos candidatures sur uni-assist pour les universités \
                              partenaires.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
            SubStepSpec {
                title: "Lettre d'admission",
                description: "Recevez et conservez la lettre d'admission officielle.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 2 : Compte bloqué",
        description: "Ouvrez un Sperrkonto au montant minimum exigé (11 208 EUR).",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Ouverture du compte",
                description: "Ouvrez le compte bloqué auprès d'un prestataire reconnu par les \
                              ambassades.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
            SubStepSpec {
                title: "Attestation de blocage",
                description: "Virez le montant requis et téléchargez l'attestation de blocage.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 3 : Certification d'allemand",
        description: "Justifiez votre niveau d'allemand (TestDaF ou DSH) selon la langue de \
                      votre programme.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
        language_requirement: Some("GERMAN"),
        sub_steps: language_sub_steps!("TestDaF"),
    },
    PhaseSpec {
        title: "Phase 4 : Assurance santé",
        description: "Souscrivez une couverture maladie reconnue en Allemagne.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Souscription de l'assurance",
                description: "Choisissez une caisse publique ou une assurance privée reconnue et \
                              souscrivez la couverture.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 5 : Visa national",
        description: "Déposez la demande de visa étudiant auprès de l'ambassade d'Allemagne.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Prise de rendez-vous",
                description: "Réservez un créneau à l'ambassade ; les délais d'attente peuvent \
                              être longs.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
            SubStepSpec {
                title: "Dépôt et suivi",
                description: "Déposez le dossier complet ; le traitement prend de 6 à 12 \
                              semaines.",
                requires_proof: false,
                proof_type: None,
            },
        ],
    },
];

// ─── États-Unis ──────────────────────────────────────────────────────────────

const USA_STUDENT: &[PhaseSpec] = &[
    PhaseSpec {
        title: "Phase 1 : Admission et formulaire I-20",
        description: "Faites-vous admettre dans une université certifiée SEVP et recevez le \
                      formulaire I-20.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Candidatures universitaires",
                description: "Déposez vos candidatures auprès d'universités certifiées SEVP.",
                requires_proof: false,
                proof_type: None,
            },
            SubStepSpec {
                title: "Réception du I-20",
                description: "Recevez le formulaire I-20 émis par l'université qui vous admet.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 2 : Certification d'anglais",
        description: "Justifiez votre niveau d'anglais par un test TOEFL ou IELTS.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
        language_requirement: Some("ENGLISH"),
        sub_steps: language_sub_steps!("TOEFL"),
    },
    PhaseSpec {
        title: "Phase 3 : Frais SEVIS et DS-160",
        description: "Réglez les frais SEVIS I-901 et remplissez le formulaire DS-160.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Paiement SEVIS I-901",
                description: "Payez les frais SEVIS (350 USD) et conservez le reçu.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
            SubStepSpec {
                title: "Formulaire DS-160",
                description: "Remplissez le DS-160 en ligne et imprimez la page de confirmation.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 4 : Preuve de fonds",
        description: "Préparez les justificatifs financiers de la première année d'études.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Justificatifs financiers",
                description: "Rassemblez relevés bancaires, bourses et lettres de garantie \
                              couvrant frais de scolarité et de séjour.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 5 : Entretien consulaire",
        description: "Passez l'entretien de visa F-1 à l'ambassade des États-Unis.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Prise de rendez-vous",
                description: "Payez les frais de visa et réservez votre entretien.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
            SubStepSpec {
                title: "Entretien et décision",
                description: "Présentez passeport, I-20 et justificatifs ; le délai de décision \
                              varie de 3 à 8 mois au total.",
                requires_proof: false,
                proof_type: None,
            },
        ],
    },
];

// ─── Luxembourg ──────────────────────────────────────────────────────────────

const LUXEMBOURG_STUDENT: &[PhaseSpec] = &[
    PhaseSpec {
        title: "Phase 1 : Admission",
        description: "Obtenez votre admission dans un établissement d'enseignement supérieur \
                      luxembourgeois.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Candidature",
                description: "Déposez votre candidature et obtenez la lettre d'admission.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 2 : Autorisation de séjour temporaire",
        description: "Demandez l'autorisation de séjour auprès de la Direction de l'immigration \
                      avant le départ.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Constitution du dossier",
                description: "Réunissez passeport, admission, ressources et casier judiciaire.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
            SubStepSpec {
                title: "Envoi de la demande",
                description: "Envoyez la demande et attendez l'autorisation écrite.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 3 : Certification de français",
        description: "Justifiez votre niveau dans la langue d'enseignement de votre programme.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
        language_requirement: Some("FRENCH"),
        sub_steps: language_sub_steps!("TCF"),
    },
    PhaseSpec {
        title: "Phase 4 : Ressources",
        description: "Prouvez des ressources suffisantes pour la durée du séjour.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Attestation bancaire ou prise en charge",
                description: "Fournissez une attestation bancaire ou une lettre de prise en \
                              charge.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 5 : Visa D et arrivée",
        description: "Obtenez le visa long séjour puis effectuez les démarches d'arrivée.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Demande de visa D",
                description: "Déposez la demande de visa auprès de l'ambassade compétente.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
            SubStepSpec {
                title: "Déclaration d'arrivée",
                description: "À l'arrivée, déclarez-vous à la commune et demandez le titre de \
                              séjour.",
                requires_proof: false,
                proof_type: None,
            },
        ],
    },
];

// ─── Suisse ──────────────────────────────────────────────────────────────────

const SUISSE_STUDENT: &[PhaseSpec] = &[
    PhaseSpec {
        title: "Phase 1 : Admission",
        description: "Obtenez la confirmation d'admission d'une université ou haute école \
                      suisse.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Candidature",
                description: "Déposez votre dossier auprès des établissements visés.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 2 : Plan d'études",
        description: "Rédigez le plan d'études et la lettre d'engagement exigés par les \
                      autorités cantonales.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Rédaction du plan d'études",
                description: "Présentez le cursus visé, sa durée et votre projet professionnel.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 3 : Certification de français",
        description: "Justifiez votre niveau dans la langue d'enseignement choisie.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
        language_requirement: Some("FRENCH"),
        sub_steps: language_sub_steps!("DELF"),
    },
    PhaseSpec {
        title: "Phase 4 : Moyens financiers",
        description: "Prouvez environ 21 000 CHF par an par attestation bancaire ou garantie.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Attestation de moyens financiers",
                description: "Fournissez l'attestation bancaire ou la garantie d'un tiers.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 5 : Visa D et décision cantonale",
        description: "Déposez la demande de visa national et attendez la décision du canton.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Dépôt de la demande",
                description: "Déposez la demande auprès de la représentation suisse de votre \
                              pays.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
            SubStepSpec {
                title: "Suivi cantonal",
                description: "Attendez l'approbation de l'autorité cantonale des migrations.",
                requires_proof: false,
                proof_type: None,
            },
        ],
    },
];

// ─── Italie ──────────────────────────────────────────────────────────────────

const ITALIE_STUDENT: &[PhaseSpec] = &[
    PhaseSpec {
        title: "Phase 1 : Préinscription Universitaly",
        description: "Préinscrivez-vous sur le portail Universitaly auprès de l'université \
                      choisie.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Création du dossier Universitaly",
                description: "Créez votre compte et complétez la demande de préinscription.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 2 : Dichiarazione di valore",
        description: "Faites établir la déclaration de valeur de votre diplôme par le consulat \
                      d'Italie.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Légalisation du diplôme",
                description: "Faites légaliser et traduire votre diplôme de fin d'études.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
            SubStepSpec {
                title: "Demande de déclaration de valeur",
                description: "Déposez la demande auprès du consulat italien compétent.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 3 : Certification d'italien",
        description: "Justifiez votre niveau d'italien (CILS ou CELI) pour les programmes \
                      italophones.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
        language_requirement: Some("ITALIAN"),
        sub_steps: language_sub_steps!("CILS"),
    },
    PhaseSpec {
        title: "Phase 4 : Ressources et logement",
        description: "Prouvez vos ressources (environ 460€ par mois) et votre hébergement.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Justificatifs de ressources",
                description: "Rassemblez les preuves de ressources et d'hébergement en Italie.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 5 : Visa D étudiant",
        description: "Déposez la demande de visa national auprès du consulat d'Italie.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Dépôt et suivi",
                description: "Déposez le dossier complet et suivez la décision consulaire.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
        ],
    },
];

// ─── Espagne ─────────────────────────────────────────────────────────────────

const ESPAGNE_STUDENT: &[PhaseSpec] = &[
    PhaseSpec {
        title: "Phase 1 : Admission",
        description: "Obtenez votre lettre d'admission d'une université espagnole.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Candidature universitaire",
                description: "Déposez vos candidatures et obtenez la carta de admisión.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 2 : Homologation du diplôme",
        description: "Faites homologuer votre diplôme auprès du ministère espagnol de \
                      l'Éducation si votre cursus l'exige.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Dossier d'homologation",
                description: "Réunissez diplôme apostillé, traduction assermentée et \
                              formulaires.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 3 : Certification d'espagnol",
        description: "Justifiez votre niveau d'espagnol (DELE ou SIELE) pour les programmes \
                      hispanophones.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
        language_requirement: Some("SPANISH"),
        sub_steps: language_sub_steps!("DELE"),
    },
    PhaseSpec {
        title: "Phase 4 : Ressources et assurance",
        description: "Prouvez vos ressources (IPREM mensuel) et souscrivez une assurance \
                      maladie.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Justificatifs financiers",
                description: "Rassemblez relevés bancaires ou attestation de prise en charge.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
            SubStepSpec {
                title: "Assurance maladie",
                description: "Souscrivez une assurance sans franchise couvrant tout le séjour.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 5 : Visa étudiant",
        description: "Déposez la demande de visa national auprès du consulat d'Espagne.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Dépôt et suivi",
                description: "Déposez le dossier et suivez la décision ; comptez 1 à 2 mois.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
        ],
    },
];

// ─── Chine ───────────────────────────────────────────────────────────────────

const CHINE_STUDENT: &[PhaseSpec] = &[
    PhaseSpec {
        title: "Phase 1 : Admission et formulaire JW202",
        description: "Obtenez la lettre d'admission d'une université chinoise et le formulaire \
                      JW202.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Candidature",
                description: "Candidatez directement ou via le portail CUCAS.",
                requires_proof: false,
                proof_type: None,
            },
            SubStepSpec {
                title: "Réception JW202",
                description: "Recevez la lettre d'admission et le formulaire JW202 originaux.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 2 : Certification de chinois",
        description: "Justifiez votre niveau de chinois (HSK) pour les programmes sinophones.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
        language_requirement: Some("CHINESE"),
        sub_steps: language_sub_steps!("HSK"),
    },
    PhaseSpec {
        title: "Phase 3 : Examen médical",
        description: "Passez l'examen médical exigé pour les séjours de plus de 6 mois.",
        requires_proof: true,
        proof_type: Some(ProofType::Certificate),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Formulaire d'examen physique",
                description: "Faites remplir le formulaire d'examen physique par un centre \
                              agréé.",
                requires_proof: true,
                proof_type: Some(ProofType::Certificate),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 4 : Visa X1",
        description: "Déposez la demande de visa étudiant X1 auprès du centre de visas chinois.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Dépôt de la demande",
                description: "Déposez passeport, JW202, admission et photos au centre de visas.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 5 : Enregistrement à l'arrivée",
        description: "Convertissez le visa en permis de résidence dans les 30 jours suivant \
                      l'arrivée.",
        requires_proof: false,
        proof_type: None,
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Permis de résidence",
                description: "Enregistrez-vous auprès du bureau de la sécurité publique avec \
                              l'université.",
                requires_proof: false,
                proof_type: None,
            },
        ],
    },
];

// ─── Generic fallback ────────────────────────────────────────────────────────

/// Fixed 5-phase plan for any unmatched `(country, visa_type)` pair.
const GENERIC_PHASES: &[PhaseSpec] = &[
    PhaseSpec {
        title: "Phase 1 : Préparation des documents",
        description: "Rassemblez tous les documents nécessaires pour votre demande de visa.",
        requires_proof: false,
        proof_type: None,
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Liste des pièces exigées",
                description: "Consultez la liste officielle des pièces exigées par le pays de \
                              destination.",
                requires_proof: false,
                proof_type: None,
            },
            SubStepSpec {
                title: "Collecte des documents",
                description: "Rassemblez passeport, diplômes, justificatifs et photos \
                              d'identité.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 2 : Création du dossier en ligne",
        description: "Créez votre compte sur la plateforme officielle et remplissez le \
                      formulaire de demande.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Création du compte",
                description: "Créez votre compte sur la plateforme officielle de demande.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 3 : Soumission de la demande",
        description: "Soumettez votre demande complète avec tous les documents requis.",
        requires_proof: true,
        proof_type: Some(ProofType::Document),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Vérification et envoi",
                description: "Vérifiez le dossier puis soumettez la demande complète.",
                requires_proof: true,
                proof_type: Some(ProofType::Document),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 4 : Paiement des frais",
        description: "Payez les frais de traitement de votre demande de visa.",
        requires_proof: true,
        proof_type: Some(ProofType::Screenshot),
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Règlement des frais",
                description: "Payez les frais et conservez le justificatif de paiement.",
                requires_proof: true,
                proof_type: Some(ProofType::Screenshot),
            },
        ],
    },
    PhaseSpec {
        title: "Phase 5 : Suivi du dossier",
        description: "Suivez l'avancement de votre demande et attendez la décision.",
        requires_proof: false,
        proof_type: None,
        language_requirement: None,
        sub_steps: &[
            SubStepSpec {
                title: "Suivi en ligne",
                description: "Consultez régulièrement l'état de votre demande.",
                requires_proof: false,
                proof_type: None,
            },
        ],
    },
];

/// Lookup table. Extend here to support a new destination.
const CATALOG: &[(&str, &str, &[PhaseSpec])] = &[
    ("France", "STUDENT", FRANCE_STUDENT),
    ("Canada", "STUDENT", CANADA_STUDENT),
    ("Belgique", "STUDENT", BELGIQUE_STUDENT),
    ("Allemagne", "STUDENT", ALLEMAGNE_STUDENT),
    ("États-Unis", "STUDENT", USA_STUDENT),
    ("Luxembourg", "STUDENT", LUXEMBOURG_STUDENT),
    ("Suisse", "STUDENT", SUISSE_STUDENT),
    ("Italie", "STUDENT", ITALIE_STUDENT),
    ("Espagne", "STUDENT", ESPAGNE_STUDENT),
    ("Chine", "STUDENT", CHINE_STUDENT),
];

/// Phases for a pair, or the generic plan when unmatched. Never fails.
pub fn phases_for(country: &str, visa_type: &str) -> &'static [PhaseSpec] {
    CATALOG
        .iter()
        .find(|(c, v, _)| *c == country && *v == visa_type)
        .map(|(_, _, phases)| *phases)
        .unwrap_or(GENERIC_PHASES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_ten_destinations() {
        assert_eq!(CATALOG.len(), 10);
    }

    #[test]
    fn test_every_entry_has_one_language_phase() {
        for (country, _, phases) in CATALOG {
            let language_phases = phases
                .iter()
                .filter(|p| p.language_requirement.is_some())
                .count();
            assert_eq!(language_phases, 1, "{country} should have one language phase");
        }
    }

    #[test]
    fn test_language_phases_have_three_sub_steps() {
        for (country, _, phases) in CATALOG {
            let phase = phases
                .iter()
                .find(|p| p.language_requirement.is_some())
                .unwrap();
            assert_eq!(
                phase.sub_steps.len(),
                3,
                "{country} language phase should carry the three test sub-steps"
            );
        }
    }

    #[test]
    fn test_france_language_phase_is_third() {
        let phases = phases_for("France", "STUDENT");
        assert_eq!(phases[2].language_requirement, Some("FRENCH"));
        assert!(phases[2].title.starts_with("Phase 3"));
    }

    #[test]
    fn test_unmatched_pair_is_generic() {
        let phases = phases_for("Atlantis", "TOURIST");
        assert_eq!(phases.len(), 5);
        assert!(phases[0].title.starts_with("Phase 1"));
        assert!(phases.iter().all(|p| p.language_requirement.is_none()));
    }
}

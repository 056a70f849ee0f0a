//! Built-in conversation texts and their override keys.
//!
//! Each `get_text`-style lookup pairs a key (overridable via the `bot_texts`
//! table) with the default wording used when no override is configured.

pub const BRAND_HEADER: &str = "🌟 *CapyVagas* | Assistente de Vagas da UTFPR\n\
Conecto você às oportunidades certas para o seu curso.";

pub const KEY_LOGIN_PROMPT_RA: &str = "login_prompt_ra";
pub const DEFAULT_LOGIN_PROMPT_RA: &str = "🔐 *Cadastro UTFPR*\n\n\
Por favor, digite seu **RA** (ex: a1234567):\n\n\
_(Digite 'cancelar' para voltar)_";

pub const KEY_LOGIN_PROMPT_PASSWORD: &str = "login_prompt_password";
pub const DEFAULT_LOGIN_PROMPT_PASSWORD: &str = "🔑 Agora digite sua **Senha** do Portal do Aluno:\n\n\
_(Seus dados são criptografados e usados apenas para validação)_";

pub const KEY_LOGIN_SUCCESS: &str = "login_success";
pub const DEFAULT_LOGIN_SUCCESS: &str = "✅ **Cadastro Confirmado!**\n\n\
Agora você pode buscar vagas personalizadas para seu curso.\n\n\
Escolha a opção 3 no menu.";

pub const KEY_LOGIN_ERROR: &str = "login_error";
pub const DEFAULT_LOGIN_ERROR: &str = "❌ **Falha no login.**\n\
RA ou senha incorretos.\n\n\
Tente digitar a senha novamente ou digite 'cancelar' para sair.";

pub const KEY_UNKNOWN_COMMAND: &str = "unknown_command";
pub const DEFAULT_UNKNOWN_COMMAND: &str = "❓ Comando não reconhecido.\n\n\
Digite *menu* para ver as opções disponíveis.";

pub const RA_TOO_SHORT: &str = "❌ RA muito curto. Tente novamente ou digite 'cancelar'.";
pub const ALREADY_REGISTERED: &str =
    "✅ Você já está cadastrado! Selecione a opção 3 para buscar vagas.";
pub const VALIDATING_CREDENTIALS: &str = "🔄 Validando credenciais...";
pub const FLOW_ERROR: &str = "❌ Erro de fluxo. Por favor, comece novamente.";
pub const LOGGED_OUT: &str = "🔒 Você saiu do sistema. Até logo!";
pub const ACTION_CANCELLED: &str = "✅ Ação cancelada.";

pub const MUST_REGISTER_FIRST: &str = "🔒 Você precisa se cadastrar primeiro (Opção 1).";
pub const NO_COURSES_CONFIGURED: &str = "⚠️ Nenhum curso cadastrado no sistema.";
pub const INVALID_COURSE_NUMBER: &str = "❌ Número inválido. Tente novamente.";
pub const COURSE_NUMBER_ONLY: &str = "❌ Digite apenas o número do curso.";
pub const INVALID_TERM_NUMBER: &str = "❌ Número inválido.";
pub const TERM_NUMBER_ONLY: &str = "❌ Digite apenas o número.";
pub const NO_COURSE_SELECTED: &str = "❌ Erro: curso não selecionado.";
pub const NO_JOBS_FOUND: &str = "😔 Nenhuma vaga encontrada no momento para esses termos.";

/// Display label for the trailing "search every term" menu slot.
pub const SEARCH_ALL_OPTION: &str = "Buscar Todos";
pub const ALL_TERMS_LABEL: &str = "Todos os termos";
